use bcrypt::{DEFAULT_COST, hash};
use clap::Parser;

/// Prints a bcrypt hash suitable for ADMIN_PASSWORD_HASH.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    password: String,

    #[arg(long, default_value_t = DEFAULT_COST)]
    cost: u32,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("{}", hash(&args.password, args.cost)?);

    Ok(())
}
