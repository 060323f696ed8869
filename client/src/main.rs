use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};
use htlc_client::HtlcClient;
use htlc_core::interface::load_escrow_data;
use htlc_core::{Address, EscrowParams, Receipt, Secret};
use tracing_subscriber::EnvFilter;

const DEFAULT_ESCROW_PARAMS_PATH: &str = "./escrow_params.json";
const DEFAULT_STATE_PATH: &str = "./htlc_state.json";

fn main() -> anyhow::Result<()> {
    // In order to view logs, run with `RUST_LOG=info`
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Deploy {
            params,
            height,
            force,
        } => {
            let params: EscrowParams = load_escrow_data(&params)?;
            let client = HtlcClient::deploy(&cli.state, params, height, force)?;
            tracing::info!(address = %client.deployment().address, "Escrow created successfully");
        }
        Commands::Fund { sender, amount } => {
            let mut client = HtlcClient::open(&cli.state)?;
            report("fund", &client.fund(sender, amount)?);
        }
        Commands::Claim { secret } => {
            let mut client = HtlcClient::open(&cli.state)?;
            report("claim", &client.claim(secret)?);
        }
        Commands::Expire => {
            let mut client = HtlcClient::open(&cli.state)?;
            report("expire", &client.expire()?);
        }
        Commands::Advance { height } => {
            let mut client = HtlcClient::open(&cli.state)?;
            client.advance(height)?;
            tracing::info!(height, "Ledger advanced");
        }
        Commands::Status => {
            let client = HtlcClient::open(&cli.state)?;
            println!("{}", serde_json::to_string_pretty(&client.status())?);
        }
    }

    Ok(())
}

fn report(transition: &str, receipt: &Receipt) {
    let event = receipt.event;
    if event.is_rejection() {
        tracing::warn!(transition, name = event.name(), code = event.code(), "Transition rejected");
    } else {
        tracing::info!(
            transition,
            name = event.name(),
            code = event.code(),
            amount = receipt.payment.map(|p| p.amount),
            "Transition accepted"
        );
    }
}

#[derive(Parser)]
#[command(name = "htlc-cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Ledger state file holding the escrow.
    #[arg(short, long, global = true,
        value_parser,
        default_value = DEFAULT_STATE_PATH,
        value_hint = ValueHint::FilePath)]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new escrow from a parameters file.
    Deploy {
        #[arg(short, long,
            value_parser,
            default_value = DEFAULT_ESCROW_PARAMS_PATH,
            value_hint = ValueHint::FilePath)]
        params: PathBuf,

        /// Block height the local ledger starts at.
        #[arg(long, default_value_t = 0)]
        height: u64,

        /// Replace an existing state file.
        #[arg(long)]
        force: bool,
    },
    /// Deposit funds into the escrow.
    Fund {
        /// 0x-prefixed address of the funder.
        #[arg(long)]
        sender: Address,

        /// Amount in the smallest unit.
        #[arg(short, long)]
        amount: u128,
    },
    /// Reveal the secret to pay the redeem party.
    Claim {
        /// 0x-prefixed hex preimage.
        #[arg(long)]
        secret: Secret,
    },
    /// Refund the refund party after expiration.
    Expire,
    /// Move the local ledger to a later block height.
    Advance {
        #[arg(long)]
        height: u64,
    },
    /// Print the escrow state as JSON.
    Status,
}
