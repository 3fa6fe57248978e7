use core_config::{tracing::init_tracing, Environment};
use migration::Migrator;
use sea_orm_migration::cli;

#[tokio::main]
async fn main() {
    core_config::tracing::install_color_eyre();
    init_tracing(&Environment::from_env());

    cli::run_cli(Migrator).await;
}
