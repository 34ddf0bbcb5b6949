pub mod appointments;
pub mod audit_logs;
pub mod customers;
pub mod diagnoses;
pub mod enums;
pub mod invoice_counters;
pub mod invoices;
pub mod part_quotes;
pub mod part_requests;
pub mod parts;
pub mod suppliers;
pub mod technicians;
pub mod vehicles;

pub use appointments::Entity as Appointments;
pub use audit_logs::Entity as AuditLogs;
pub use customers::Entity as Customers;
pub use diagnoses::Entity as Diagnoses;
pub use invoice_counters::Entity as InvoiceCounters;
pub use invoices::Entity as Invoices;
pub use part_quotes::Entity as PartQuotes;
pub use part_requests::Entity as PartRequests;
pub use parts::Entity as Parts;
pub use suppliers::Entity as Suppliers;
pub use technicians::Entity as Technicians;
pub use vehicles::Entity as Vehicles;
