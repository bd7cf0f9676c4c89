pub mod csv_pipeline;
pub mod json_pipeline;
pub mod sales_pipeline;
pub mod text_pipeline;
pub mod xlsx_pipeline;

pub use csv_pipeline::CsvPipeline;
pub use json_pipeline::JsonPipeline;
pub use sales_pipeline::SalesPipeline;
pub use text_pipeline::TextPipeline;
pub use xlsx_pipeline::XlsxPipeline;
