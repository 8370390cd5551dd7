use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for the vehicle service API gateway", long_about = None)]
struct Cli {
    #[arg(short, long, env = "GATEWAY_URL", default_value = "http://localhost:3000")]
    url: String,

    /// Bearer token sent with every request (as returned by `login`).
    #[arg(short, long, env = "GATEWAY_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Gateway liveness
    Health,
    /// Raw Prometheus metrics
    Metrics,
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and print the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Book a service package
    Book {
        #[arg(long)]
        customer: String,
        #[arg(long)]
        package: String,
        #[arg(long)]
        vehicle: String,
        #[arg(long)]
        price: f64,
        /// Included service; repeat for several
        #[arg(long = "service", required = true)]
        services: Vec<String>,
        #[arg(long, default_value = "3 months")]
        validity: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List all bookings, newest first
    Bookings,
    /// Show one booking
    Booking { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    if let Some(token) = &cli.token {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))?,
        );
    }

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{base}/health")).headers(headers).send().await?;
            print_response(res).await?;
        }
        Commands::Metrics => {
            let res = client.get(format!("{base}/metrics")).headers(headers).send().await?;
            println!("{}", res.text().await?);
        }
        Commands::Register { name, email, password } => {
            let res = client
                .post(format!("{base}/api/register"))
                .headers(headers)
                .json(&json!({ "name": name, "email": email, "password": password }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Login { email, password } => {
            let res = client
                .post(format!("{base}/api/login"))
                .headers(headers)
                .json(&json!({ "email": email, "password": password }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Book {
            customer,
            package,
            vehicle,
            price,
            services,
            validity,
            phone,
            email,
            notes,
        } => {
            let res = client
                .post(format!("{base}/api/bookService"))
                .headers(headers)
                .json(&json!({
                    "customerName": customer,
                    "packageName": package,
                    "vehicleType": vehicle,
                    "totalPrice": price,
                    "servicesIncluded": services,
                    "validityPeriod": validity,
                    "contactNumber": phone,
                    "email": email,
                    "notes": notes,
                }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Bookings => {
            let res = client.get(format!("{base}/api/bookings")).headers(headers).send().await?;
            print_response(res).await?;
        }
        Commands::Booking { id } => {
            // Not routed by the gateway; point --url at the booking service or backend.
            let res = client
                .get(format!("{base}/api/booking/{id}"))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{rendered}");
    } else {
        eprintln!("Error: server returned status {status}");
        eprintln!("{rendered}");
        std::process::exit(1);
    }
    Ok(())
}
