use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "directory-cli")]
#[command(about = "Command-line client for the employee directory service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all employees
    List,
    /// Show one employee
    Get { id: String },
    /// Find employees whose name contains a fragment
    Search { fragment: String },
    /// Highest salary in the directory
    HighestSalary,
    /// Names of the ten best paid employees
    TopEarners,
    /// Create an employee
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        salary: u64,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        title: String,
    },
    /// Delete an employee by id
    Delete { id: String },
    /// Inspect the snapshot cache
    CacheStatus,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let api = format!("{}/api/v1/employee", cli.url.trim_end_matches('/'));

    let request = match cli.command {
        Commands::List => client.get(&api),
        Commands::Get { id } => client.get(format!("{}/{}", api, id)),
        Commands::Search { fragment } => client.get(format!("{}/search/{}", api, fragment)),
        Commands::HighestSalary => client.get(format!("{}/highestSalary", api)),
        Commands::TopEarners => client.get(format!("{}/topTenHighestEarningEmployeeNames", api)),
        Commands::Create { name, salary, age, title } => client.post(&api).json(&json!({
            "name": name,
            "salary": salary,
            "age": age,
            "title": title,
        })),
        Commands::Delete { id } => client.delete(format!("{}/{}", api, id)),
        Commands::CacheStatus => {
            client.get(format!("{}/admin/cache", cli.url.trim_end_matches('/')))
        }
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }
    if text.is_empty() {
        println!("(no content)");
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
