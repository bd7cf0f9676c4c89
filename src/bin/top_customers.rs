use anyhow::Context;
use clap::Parser;
use datafun_analytics::app::pipelines::sales_pipeline::{extract_sales, render_top_customers_csv};
use datafun_analytics::utils::logger;
use datafun_analytics::utils::validation::parse_date;
use datafun_analytics::TopCustomersQuery;

#[derive(Parser, Debug)]
#[command(name = "top_customers")]
#[command(about = "Rank customers by total spend over a date range")]
struct Args {
    /// Sales CSV with columns customer_id,amount,sale_date
    #[arg(short, long)]
    input: String,

    /// First day of the range (inclusive), YYYY-MM-DD
    #[arg(long)]
    start: String,

    /// Day after the range (exclusive), YYYY-MM-DD
    #[arg(long)]
    end: String,

    /// Maximum number of customers to return
    #[arg(short = 'n', long, default_value = "10", allow_negative_numbers = true)]
    limit: i64,

    /// Also write the result as CSV to this path
    #[arg(short, long)]
    output: Option<String>,

    /// Print the equivalent SQL before the result
    #[arg(long)]
    explain: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let start = parse_date("start", &args.start)?;
    let end = parse_date("end", &args.end)?;
    let query = TopCustomersQuery::new(start, end, args.limit);
    if query.is_empty_range() {
        tracing::warn!("⚠️ Range [{}, {}) contains no dates", start, end);
    }

    let data = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read sales file '{}'", args.input))?;
    let sales = extract_sales(&data).with_context(|| format!("Invalid sales file '{}'", args.input))?;
    tracing::info!("Loaded {} sales from {}", sales.len(), args.input);

    if args.explain {
        println!("{}\n", query.to_sql());
    }

    let rows = query.execute(&sales);
    if rows.is_empty() {
        println!("No sales in range.");
    } else {
        println!("{:<6}{:<20}{:>14}", "rank", "customer_id", "total_spend");
        for (rank, row) in rows.iter().enumerate() {
            println!("{:<6}{:<20}{:>14.2}", rank + 1, row.customer_id, row.total_spend);
        }
    }

    if let Some(output) = &args.output {
        let table = render_top_customers_csv(&rows)?;
        std::fs::write(output, table)
            .with_context(|| format!("Failed to write result to '{}'", output))?;
        tracing::info!("📁 Result saved to: {}", output);
    }

    Ok(())
}
