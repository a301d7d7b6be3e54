use anyhow::{Result, bail};
use clap::Parser;

const OUTCOMES: [&str; 4] = [
    "Presença confirmada com sucesso!",
    "Seu nome não está na lista de convidados.",
    "Digite nome e sobrenome para confirmar.",
    "Ocorreu um erro. Tente novamente.",
];

/// Submits a name to a running RSVP server and prints the outcome.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    nome: String,

    #[arg(long, default_value = "http://127.0.0.1:5000")]
    url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let response = reqwest::Client::new()
        .post(&args.url)
        .form(&[("nome", args.nome.as_str())])
        .send()
        .await?;

    println!("Status: {}", response.status());

    let body = response.text().await?;
    match OUTCOMES.iter().find(|outcome| body.contains(*outcome)) {
        Some(outcome) => println!("{outcome}"),
        None => bail!("No outcome message in response"),
    }

    Ok(())
}
