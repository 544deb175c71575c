pub mod json_api;

pub use json_api::{
    generate_report_json, generate_report_json_with, snapshot_schema_json, ReportRequest,
    SCHEMA_VERSION,
};
