use clap::Parser;
use reqwest::Client;
use rustyline::{error::ReadlineError, DefaultEditor};
use serde::Serialize;
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// System whose field aliases are reported with each match
    #[arg(short, long, default_value = "default")]
    system: String,

    /// LIMIT applied to generated queries (0 = none)
    #[arg(short, long, default_value_t = 0)]
    limit: u32,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    description: &'a str,
    system: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
}

/// Settings that apply to every description sent during the session
struct Session {
    system: String,
    limit: u32,
}

fn print_usage() {
    println!("fieldsql Client Commands:");
    println!("  <description>     - Generate SQL for a plain-language description (default)");
    println!("  :fields [system]  - List field mappings, optionally only those with a system alias");
    println!("  :system <name>    - Use <name> for reported field aliases (\"default\" for none)");
    println!("  :limit <n>        - Add LIMIT <n> to generated queries (0 to disable)");
    println!("  :health           - Check the server");
    println!("  :help             - Show this help");
    println!();
    println!("Examples:");
    println!("  get user emails");
    println!("  count total orders");
    println!("  :fields system_a");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let client = Client::new();
    let mut session = Session {
        system: args.system.clone(),
        limit: args.limit,
    };

    println!("\nConnected to fieldsql server at {}.", args.url);
    println!("Type :help for commands.\n");

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline("fieldsql :) ");
        match readline {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                rl.add_history_entry(input)?;

                if input.starts_with(':') {
                    let parts: Vec<&str> = input.splitn(2, ' ').collect();
                    let cmd = parts[0];
                    let arg = parts.get(1).map(|s| s.trim().to_string());

                    match cmd {
                        ":help" | ":h" => print_usage(),
                        ":fields" | ":f" => {
                            match list_fields(&client, &args.url, arg.as_deref()).await {
                                Ok(response) => print_fields(&response),
                                Err(e) => eprintln!("Error: {}", e),
                            }
                        }
                        ":system" => match arg {
                            Some(system) if !system.is_empty() => {
                                println!("System set to {}", system);
                                session.system = system;
                            }
                            _ => println!("Usage: :system <name>"),
                        },
                        ":limit" => match arg.as_deref().map(str::parse::<u32>) {
                            Some(Ok(limit)) => {
                                session.limit = limit;
                                if limit == 0 {
                                    println!("LIMIT disabled");
                                } else {
                                    println!("LIMIT set to {}", limit);
                                }
                            }
                            _ => println!("Usage: :limit <non-negative integer>"),
                        },
                        ":health" => match health(&client, &args.url).await {
                            Ok(response) => println!("\n{}\n", response),
                            Err(e) => eprintln!("Error: {}", e),
                        },
                        _ => {
                            println!(
                                "Unknown command: {}. Type :help for available commands.",
                                cmd
                            );
                        }
                    }
                    continue;
                }

                match generate_query(&client, &args.url, &session, input).await {
                    Ok(response) => print_generated_query(&response),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("\nBye");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

fn print_generated_query(response: &Value) {
    let query = response.get("query").and_then(|q| q.as_str()).unwrap_or("?");
    let confidence = response
        .get("confidence")
        .and_then(|c| c.as_f64())
        .unwrap_or(0.0);
    let elapsed = response
        .get("processing_time_ms")
        .and_then(|t| t.as_u64())
        .unwrap_or(0);

    println!("\n{}\n", query);
    println!("  confidence: {:.1}  ({} ms)", confidence, elapsed);

    if let Some(fields) = response.get("matched_fields").and_then(|f| f.as_array()) {
        println!("  matched fields:");
        for field in fields {
            let table = field.get("table_name").and_then(|t| t.as_str()).unwrap_or("?");
            let column = field.get("column_name").and_then(|c| c.as_str()).unwrap_or("?");
            let score = field.get("match_score").and_then(|s| s.as_f64()).unwrap_or(0.0);
            match field.get("system_field").and_then(|s| s.as_str()) {
                Some(alias) => println!("    {}.{} ({:.1}) as {}", table, column, score, alias),
                None => println!("    {}.{} ({:.1})", table, column, score),
            }
        }
    }

    if let Some(joins) = response.get("joins_used").and_then(|j| j.as_array()) {
        if !joins.is_empty() {
            println!("  joins:");
            for join in joins {
                let condition = join.get("condition").and_then(|c| c.as_str()).unwrap_or("?");
                println!("    {}", condition);
            }
        }
    }
    println!();
}

fn print_fields(response: &Value) {
    let Some(fields) = response.get("fields").and_then(|f| f.as_array()) else {
        println!("\n{}\n", response);
        return;
    };

    println!("\n=== {} Field(s) ===\n", fields.len());
    for field in fields {
        let table = field.get("table_name").and_then(|t| t.as_str()).unwrap_or("?");
        let column = field.get("column_name").and_then(|c| c.as_str()).unwrap_or("?");
        let description = field
            .get("description")
            .and_then(|d| d.as_str())
            .unwrap_or("");
        print!("  {}.{} - {}", table, column, description);

        let foreign_table = field
            .get("foreign_table")
            .and_then(|t| t.as_str())
            .unwrap_or("");
        let foreign_key = field
            .get("foreign_key")
            .and_then(|k| k.as_str())
            .unwrap_or("");
        if !foreign_table.is_empty() && !foreign_key.is_empty() {
            print!(" -> {}.{}", foreign_table, foreign_key);
        }
        println!();
    }
    println!();
}

async fn generate_query(
    client: &Client,
    url: &str,
    session: &Session,
    description: &str,
) -> Result<Value, String> {
    let endpoint = format!("{}/api/v1/generate-query", url);
    let payload = GenerateRequest {
        description,
        system: &session.system,
        limit: (session.limit > 0).then_some(session.limit),
    };

    let response = client
        .post(&endpoint)
        .json(&payload)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if response.status().is_success() {
        response.json().await.map_err(|e| e.to_string())
    } else {
        Err(error_text(response).await)
    }
}

async fn list_fields(client: &Client, url: &str, system: Option<&str>) -> Result<Value, String> {
    let endpoint = format!("{}/api/v1/fields", url);
    let mut request = client.get(&endpoint);
    if let Some(system) = system.filter(|s| !s.is_empty()) {
        request = request.query(&[("system", system)]);
    }

    let response = request.send().await.map_err(|e| e.to_string())?;

    if response.status().is_success() {
        response.json().await.map_err(|e| e.to_string())
    } else {
        Err(error_text(response).await)
    }
}

async fn health(client: &Client, url: &str) -> Result<Value, String> {
    let endpoint = format!("{}/health", url);

    let response = client
        .get(&endpoint)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if response.status().is_success() {
        response.json().await.map_err(|e| e.to_string())
    } else {
        Err(error_text(response).await)
    }
}

/// Pull the "error" message out of an error body, falling back to the raw text
async fn error_text(response: reqwest::Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .map(|message| format!("{} ({})", message, status))
        .unwrap_or(text)
}
