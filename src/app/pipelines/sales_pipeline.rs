use crate::analytics::{verify_top_customers, TopCustomersQuery};
use crate::config::toml_config::SalesConfig;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{CustomerSpend, Sale};
use crate::utils::error::{EtlError, Result};

/// Top customers by spend, written as a text report and a CSV table.
pub struct SalesPipeline<S: Storage> {
    storage: S,
    input_path: String,
    output_path: String,
    csv_output_path: String,
    query: TopCustomersQuery,
}

impl<S: Storage> SalesPipeline<S> {
    pub fn new<C: ConfigProvider>(storage: S, paths: &C, settings: &SalesConfig) -> Result<Self> {
        let (start, end) = settings.date_range()?;
        Ok(Self {
            storage,
            input_path: paths.raw_path(&settings.input),
            output_path: paths.processed_path(&settings.output),
            csv_output_path: paths.processed_path(&settings.csv_output),
            query: TopCustomersQuery::new(start, end, settings.limit),
        })
    }

    pub fn query(&self) -> &TopCustomersQuery {
        &self.query
    }
}

/// Parses `customer_id,amount,sale_date` rows. Any malformed row fails the whole read.
pub fn extract_sales(data: &[u8]) -> Result<Vec<Sale>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut sales = Vec::new();
    for row in reader.deserialize::<Sale>() {
        let sale = row?;
        if !sale.amount.is_finite() {
            return Err(EtlError::validation(format!(
                "Non-finite amount for customer {}",
                sale.customer_id
            )));
        }
        sales.push(sale);
    }
    Ok(sales)
}

pub fn render_top_customers_report(query: &TopCustomersQuery, rows: &[CustomerSpend]) -> String {
    let mut out = format!(
        "Top Customers by Spend\nRange: [{}, {})\nLimit: {}\n\n{}\n\n",
        query.start,
        query.end,
        query.limit,
        query.to_sql()
    );
    if rows.is_empty() {
        out.push_str("No sales in range.\n");
    }
    for (rank, row) in rows.iter().enumerate() {
        out.push_str(&format!("{}. {}: {:.2}\n", rank + 1, row.customer_id, row.total_spend));
    }
    out
}

pub fn render_top_customers_csv(rows: &[CustomerSpend]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["customer_id", "total_spend"])?;
    for row in rows {
        let total = format!("{:.2}", row.total_spend);
        writer.write_record([row.customer_id.as_str(), total.as_str()])?;
    }
    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for SalesPipeline<S> {
    type Extracted = Vec<Sale>;
    type Transformed = Vec<CustomerSpend>;

    fn label(&self) -> &str {
        "SALES"
    }

    async fn extract(&self) -> Result<Vec<Sale>> {
        if !self.storage.exists(&self.input_path).await {
            return Err(EtlError::FileNotFound {
                path: self.input_path.clone(),
            });
        }
        let data = self.storage.read_file(&self.input_path).await?;
        let sales = extract_sales(&data)?;
        tracing::debug!("SALES: read {} rows from {}", sales.len(), self.input_path);
        Ok(sales)
    }

    async fn transform(&self, data: Vec<Sale>) -> Result<Vec<CustomerSpend>> {
        Ok(self.query.execute(&data))
    }

    fn verify(&self, result: &Vec<CustomerSpend>) -> Result<()> {
        verify_top_customers(result, self.query.limit)
    }

    async fn load(&self, result: Vec<CustomerSpend>) -> Result<String> {
        let table = render_top_customers_csv(&result)?;
        self.storage.write_file(&self.csv_output_path, &table).await?;
        tracing::debug!("SALES: wrote {}", self.csv_output_path);

        let report = render_top_customers_report(&self.query, &result);
        self.storage
            .write_file(&self.output_path, report.as_bytes())
            .await?;
        Ok(self.output_path.clone())
    }
}
