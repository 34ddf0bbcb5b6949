pub mod appointment_service;
pub mod customer_service;
pub mod dashboard_service;
pub mod diagnosis_service;
pub mod invoice_service;
pub mod lookup;
pub mod parts_service;
pub mod supplier_service;
pub mod technician_service;
pub mod vehicle_service;
