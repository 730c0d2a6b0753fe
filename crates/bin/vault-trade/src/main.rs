//! vault-trade: order codec tools and an offline demo
//!
//! the demo runs against the masking mock sdk and an in-memory contract;
//! nothing here talks to a network.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use vault_client::{
    sample_order, ClientConfig, MemoryOrderBook, MockFheInstance, OrderClient, OrderType,
    TradingOrder,
};
use vault_codec::{decode_symbol, encode_symbol, format_handle, Address, RawHandle};

#[derive(Parser)]
#[command(name = "vault-trade")]
#[command(about = "fhe order codec tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// trading contract address (overrides VAULT_TRADE_CONTRACT_ADDRESS)
    #[arg(long, global = true)]
    contract: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// fold a ticker symbol into its encrypted integer form
    EncodeSymbol { symbol: String },

    /// recover a ticker from its integer form
    DecodeSymbol { value: u64 },

    /// normalize a hex handle to bytes32 width
    FormatHandle { handle: String },

    /// encrypt the sample order with the mock sdk
    SelfTest,

    /// place an order and reveal it again (mock sdk, in-memory contract)
    Demo {
        #[arg(long, default_value = "AAPL")]
        symbol: String,

        #[arg(long, default_value_t = 100)]
        quantity: u64,

        #[arg(long, default_value_t = 50.25)]
        price: f64,

        /// buy or sell
        #[arg(long, default_value = "buy")]
        side: OrderType,

        /// caller address
        #[arg(long, default_value = "0x0000000000000000000000000000000000000001")]
        user: String,
    },

    /// print the resolved configuration as json
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vault_trade=info,vault_client=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env().context("invalid environment configuration")?;
    if let Some(contract) = &cli.contract {
        config.contract_address = contract.parse().context("invalid --contract")?;
    }

    match cli.command {
        Commands::EncodeSymbol { symbol } => {
            println!("{}", encode_symbol(&symbol));
        }
        Commands::DecodeSymbol { value } => {
            println!("{}", decode_symbol(value));
        }
        Commands::FormatHandle { handle } => {
            println!("{}", format_handle(&RawHandle::Text(handle)));
        }
        Commands::SelfTest => {
            let client = OrderClient::new(
                MockFheInstance::new(),
                MemoryOrderBook::new(config.contract_address),
                Address::ZERO,
            );
            if !client.self_test().await {
                anyhow::bail!("fhe self-test failed");
            }
            println!("ok");
        }
        Commands::Demo {
            symbol,
            quantity,
            price,
            side,
            user,
        } => {
            let user: Address = user.parse().context("invalid --user")?;
            let order = TradingOrder {
                stock_symbol: symbol,
                quantity,
                price,
                order_type: side,
                ..sample_order()
            };
            handle_demo(&config, user, order).await?;
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

async fn handle_demo(config: &ClientConfig, user: Address, order: TradingOrder) -> anyhow::Result<()> {
    info!(contract = %config.contract_address, %user, "running offline demo");

    let client = OrderClient::new(
        MockFheInstance::new(),
        MemoryOrderBook::new(config.contract_address),
        user,
    );

    let placed = client.place_order(&order).await?;
    println!("tx:      {}", placed.tx_hash);
    for (name, handle) in vault_codec::order::ORDER_FIELDS.iter().zip(&placed.handles) {
        println!("  {:<12} {}", name, handle);
    }

    let order_id = client.order_count().await?;
    let revealed = client.reveal_order(order_id).await?;
    println!("revealed: {}", serde_json::to_string_pretty(&revealed)?);

    Ok(())
}
