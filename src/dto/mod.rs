pub mod appointments;
pub mod customers;
pub mod dashboard;
pub mod diagnoses;
pub mod invoices;
pub mod parts;
pub mod suppliers;
pub mod technicians;
pub mod vehicles;
