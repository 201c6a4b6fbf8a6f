use clap::Parser;
use linear_cut_optimizer::price_sheet::{PriceColumn, PriceSheet};
use linear_cut_optimizer::render;
use linear_cut_optimizer::{CostConfig, CutRequirement, InvoiceResult, PriceEntry, StockQuantity};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "linear_cut_optimizer",
    about = "1D cutting stock optimizer for bar and extrusion stock"
)]
struct Cli {
    /// Standard stock lengths in mm (e.g. 500 1000 1500 3050)
    #[arg(long, num_args = 1..)]
    stock: Vec<u32>,

    /// Cut lengths as length:qty (e.g. 1000:2 500:1)
    #[arg(long = "cuts", num_args = 1..)]
    cuts: Vec<String>,

    /// Blade kerf width in mm (default: 0)
    #[arg(long, default_value_t = 0)]
    kerf: u32,

    /// Setup fee charged once per distinct stock length used
    #[arg(long)]
    setup_fee: Option<f64>,

    /// Fee charged per cut
    #[arg(long)]
    cut_fee: Option<f64>,

    /// Pieces available per stock length as length:qty
    #[arg(long, num_args = 1..)]
    available: Vec<String>,

    /// Price per stock piece as length:price
    #[arg(long, num_args = 1..)]
    price: Vec<String>,

    /// Extrusion price sheet (CSV) to take stock lengths and prices from
    #[arg(long, requires = "profile")]
    price_sheet: Option<std::path::PathBuf>,

    /// Profile to look up in the price sheet (e.g. V2020)
    #[arg(long)]
    profile: Option<String>,

    /// Price sheet column: sale or cost
    #[arg(long, default_value = "sale", value_parser = parse_price_column)]
    price_column: PriceColumn,

    /// Show an ASCII bar for each stock piece
    #[arg(long)]
    layout: bool,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Log allocation decisions to stderr
    #[arg(long)]
    verbose: bool,
}

fn parse_price_column(s: &str) -> Result<PriceColumn, String> {
    match s {
        "sale" => Ok(PriceColumn::Sale),
        "cost" => Ok(PriceColumn::Cost),
        _ => Err(format!(
            "invalid price column '{}', expected: sale or cost",
            s
        )),
    }
}

fn parse_pair(s: &str, what: &str) -> Result<(u32, String), String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(format!("invalid {} '{}', expected length:{}", what, s, what));
    }
    let length = parts[0]
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid length in '{}'", s))?;
    if length == 0 {
        return Err(format!("length must be non-zero in '{}'", s));
    }
    Ok((length, parts[1].trim().to_string()))
}

fn parse_cut(s: &str) -> Result<CutRequirement, String> {
    let (length, qty) = parse_pair(s, "qty")?;
    let quantity = qty
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    if quantity == 0 {
        return Err(format!("quantity must be non-zero in '{}'", s));
    }
    Ok(CutRequirement::new(length, quantity))
}

fn parse_available(s: &str) -> Result<StockQuantity, String> {
    let (stock_length, qty) = parse_pair(s, "qty")?;
    let quantity = qty
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    Ok(StockQuantity {
        stock_length,
        quantity,
    })
}

fn parse_price(s: &str) -> Result<PriceEntry, String> {
    let (stock_length, price) = parse_pair(s, "price")?;
    let price = price
        .parse::<f64>()
        .map_err(|_| format!("invalid price in '{}'", s))?;
    Ok(PriceEntry {
        stock_length,
        price,
    })
}

fn exit_with(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

/// Stock lengths and price list from the command line, falling back to the
/// price sheet for whatever was not given explicitly.
fn load_catalogue(cli: &Cli) -> Result<(Vec<u32>, Vec<PriceEntry>), String> {
    let mut lengths = cli.stock.clone();
    let mut prices = cli
        .price
        .iter()
        .map(|p| parse_price(p))
        .collect::<Result<Vec<_>, _>>()?;

    if let (Some(path), Some(profile)) = (&cli.price_sheet, &cli.profile) {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read price sheet {}: {}", path.display(), e))?;
        let sheet = PriceSheet::parse(&text);
        let sheet_lengths = sheet.standard_lengths(profile);
        if sheet_lengths.is_empty() {
            return Err(format!(
                "profile '{}' not found in {} (known: {})",
                profile,
                path.display(),
                sheet.profiles().join(", ")
            ));
        }
        if lengths.is_empty() {
            lengths = sheet_lengths;
        }
        if prices.is_empty() {
            prices = sheet.price_list(profile, cli.price_column);
        }
    }

    if lengths.is_empty() {
        return Err("no stock lengths given, use --stock or --price-sheet".to_string());
    }
    Ok((lengths, prices))
}

fn cost_config(cli: &Cli, prices: Vec<PriceEntry>) -> Result<Option<CostConfig>, String> {
    let available_stock = cli
        .available
        .iter()
        .map(|a| parse_available(a))
        .collect::<Result<Vec<_>, _>>()?;

    if cli.setup_fee.is_none()
        && cli.cut_fee.is_none()
        && available_stock.is_empty()
        && prices.is_empty()
    {
        return Ok(None);
    }

    Ok(Some(CostConfig {
        setup_fee_per_length: cli.setup_fee.unwrap_or(0.0),
        per_cut_fee: cli.cut_fee.unwrap_or(0.0),
        available_stock,
        price_list: if prices.is_empty() { None } else { Some(prices) },
    }))
}

fn print_report(result: &InvoiceResult, kerf: u32, layout: bool) {
    for (i, pattern) in result.patterns.iter().enumerate() {
        let cuts: Vec<String> = pattern.cuts.iter().map(|c| c.to_string()).collect();
        println!(
            "Piece {} ({} mm): {}  [waste {} mm]",
            i + 1,
            pattern.stock_length,
            cuts.join(", "),
            pattern.waste
        );
        if layout {
            print!("{}", render::render_pattern(pattern, kerf));
        }
    }
    if !result.patterns.is_empty() {
        println!();
    }

    println!("Stock usage:");
    for usage in &result.stock_usage {
        println!("  {} mm x {}", usage.stock_length, usage.quantity);
    }

    println!("Cuts by length:");
    for cut in &result.aggregated_cuts {
        println!("  {} mm x {}", cut.length, cut.quantity);
    }

    if let Some(costs) = &result.costs {
        println!("Costs:");
        for row in &costs.cost_by_length {
            let material = row
                .material_cost
                .map(|m| format!(", material {:.2}", m))
                .unwrap_or_default();
            println!(
                "  {} mm: {} piece{}, {} cut{}, setup {:.2}, cutting {:.2}{}, total {:.2}",
                row.stock_length,
                row.quantity,
                if row.quantity == 1 { "" } else { "s" },
                row.total_cuts,
                if row.total_cuts == 1 { "" } else { "s" },
                row.setup_fee,
                row.cutting_cost,
                material,
                row.total_cost
            );
        }
        println!(
            "  Setup {:.2} + cutting {:.2} + material {:.2} = {:.2}",
            costs.total_setup_fees,
            costs.total_cutting_costs,
            costs.total_material_costs,
            costs.total_cost
        );
    }

    println!();
    println!(
        "Summary: {} piece{} used, {} cut{}, {:.1}% waste",
        result.total_stock_pieces,
        if result.total_stock_pieces == 1 { "" } else { "s" },
        result.total_cuts,
        if result.total_cuts == 1 { "" } else { "s" },
        result.waste_percent,
    );
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let requirements: Vec<CutRequirement> = cli
        .cuts
        .iter()
        .map(|c| parse_cut(c))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| exit_with(e));

    let (lengths, prices) = load_catalogue(&cli).unwrap_or_else(|e| exit_with(e));
    let config = cost_config(&cli, prices).unwrap_or_else(|e| exit_with(e));

    let result =
        linear_cut_optimizer::optimize(&requirements, &lengths, cli.kerf, config.as_ref())
            .unwrap_or_else(|e| exit_with(e));

    if cli.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => exit_with(e),
        }
    } else {
        print_report(&result, cli.kerf, cli.layout);
    }
}
