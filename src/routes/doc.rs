use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    billing::{LaborLine, PartCondition, PartLine},
    dto::{
        appointments::{AppointmentList, CreateAppointmentRequest, UpdateAppointmentStatusRequest},
        customers::{
            CreateCustomerRequest, CustomerHistory, CustomerList, CustomerWithVehicles,
            UpdateCustomerRequest,
        },
        dashboard::{
            ActivityItem, ActivityKind, DashboardStats, DiagnosisStats, MonthlyRevenue,
            RecentActivity, RevenueChart,
        },
        diagnoses::{CreateDiagnosisRequest, DiagnosisList, UpdateDiagnosisRequest},
        invoices::{
            CreateInvoiceRequest, InvoiceList, UpdateInvoiceDetailRequest,
            UpdateInvoiceStatusRequest,
        },
        parts::{
            CreatePartRequest, CreatePartRequestRequest, CreateQuoteRequest, PartList,
            PartRequestList, UpdatePartRequestStatusRequest,
        },
        suppliers::{CreateSupplierRequest, SupplierList},
        technicians::{CreateTechnicianRequest, TechnicianList},
        vehicles::{CreateVehicleRequest, UpdateVehicleRequest, VehicleList, VehicleWithDiagnoses},
    },
    entity::enums::{
        AppointmentKind, AppointmentStatus, DiagnosisStatus, InvoiceStatus, PartRequestStatus,
        Priority, SupplierKind, VehicleStatus,
    },
    models::{
        Appointment, Customer, CustomerContact, Diagnosis, HistoryEntry, Invoice, Part, PartQuote,
        PartRequest, Supplier, Technician, Vehicle,
    },
    response::{ApiResponse, Meta},
    routes::{
        appointments, customers, dashboard, diagnoses, health, invoices, params, parts, suppliers,
        technicians, vehicles,
    },
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Garage API", description = "Workshop management: customers, vehicles, diagnoses, parts, appointments and invoicing"),
    paths(
        health::health_check,
        customers::list_customers,
        customers::create_customer,
        customers::get_customer,
        customers::update_customer,
        customers::delete_customer,
        customers::customer_history,
        vehicles::list_vehicles,
        vehicles::create_vehicle,
        vehicles::get_vehicle,
        vehicles::update_vehicle,
        vehicles::delete_vehicle,
        technicians::list_technicians,
        technicians::create_technician,
        technicians::get_technician,
        diagnoses::list_diagnoses,
        diagnoses::create_diagnosis,
        diagnoses::get_diagnosis,
        diagnoses::update_diagnosis,
        parts::list_parts,
        parts::create_part,
        parts::list_requests,
        parts::create_request,
        parts::update_request_status,
        parts::add_quote,
        suppliers::list_suppliers,
        suppliers::create_supplier,
        appointments::list_appointments,
        appointments::create_appointment,
        appointments::update_appointment_status,
        invoices::list_invoices,
        invoices::create_invoice,
        invoices::get_invoice,
        invoices::update_invoice_status,
        invoices::update_invoice_detail,
        dashboard::stats,
        dashboard::revenue_chart,
        dashboard::diagnosis_stats,
        dashboard::recent_activity
    ),
    components(
        schemas(
            Customer,
            CustomerContact,
            Vehicle,
            Technician,
            Diagnosis,
            HistoryEntry,
            Part,
            PartQuote,
            PartRequest,
            Supplier,
            Appointment,
            Invoice,
            PartLine,
            LaborLine,
            PartCondition,
            VehicleStatus,
            DiagnosisStatus,
            Priority,
            AppointmentStatus,
            AppointmentKind,
            PartRequestStatus,
            SupplierKind,
            InvoiceStatus,
            CreateCustomerRequest,
            UpdateCustomerRequest,
            CustomerList,
            CustomerWithVehicles,
            CustomerHistory,
            CreateVehicleRequest,
            UpdateVehicleRequest,
            VehicleList,
            VehicleWithDiagnoses,
            CreateTechnicianRequest,
            TechnicianList,
            CreateDiagnosisRequest,
            UpdateDiagnosisRequest,
            DiagnosisList,
            CreatePartRequest,
            CreatePartRequestRequest,
            UpdatePartRequestStatusRequest,
            CreateQuoteRequest,
            PartList,
            PartRequestList,
            CreateSupplierRequest,
            SupplierList,
            CreateAppointmentRequest,
            UpdateAppointmentStatusRequest,
            AppointmentList,
            CreateInvoiceRequest,
            UpdateInvoiceStatusRequest,
            UpdateInvoiceDetailRequest,
            InvoiceList,
            DashboardStats,
            MonthlyRevenue,
            RevenueChart,
            DiagnosisStats,
            ActivityKind,
            ActivityItem,
            RecentActivity,
            params::Pagination,
            health::HealthData,
            Meta,
            ApiResponse<Invoice>,
            ApiResponse<InvoiceList>,
            ApiResponse<Customer>,
            ApiResponse<CustomerList>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Customers", description = "Customer records and repair history"),
        (name = "Vehicles", description = "Vehicle records"),
        (name = "Technicians", description = "Workshop technicians"),
        (name = "Diagnoses", description = "Fault diagnoses"),
        (name = "Parts", description = "Part catalog, requests and supplier quotes"),
        (name = "Suppliers", description = "Part suppliers"),
        (name = "Appointments", description = "Workshop schedule"),
        (name = "Invoices", description = "Invoice calculation and numbering"),
        (name = "Dashboard", description = "Aggregated figures"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_api_group() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/customers/{id}/history",
            "/api/vehicles/{id}",
            "/api/parts/requests/{id}/quotes",
            "/api/appointments/{id}/status",
            "/api/invoices/{id}/detail",
            "/api/dashboard/recent-activity",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
