use crate::commands::CommandResult;
use sourcedesk_core::config::{AppConfig, LoadOptions};
use sourcedesk_store::{fixtures, snapshot};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "seed",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let gateway = fixtures::demo_gateway()
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 4u8))?;

        let document = gateway.snapshot(config.store.mode.marker()).await;
        snapshot::persist(&config.store.snapshot_path, &document)
            .map_err(|error| ("snapshot_write", error.to_string(), 5u8))?;

        Ok::<_, (&'static str, String, u8)>(SeedOutput {
            users: document.users.len(),
            products: document.products.len(),
        })
    });

    match result {
        Ok(output) => CommandResult::success(
            "seed",
            format!(
                "demo dataset loaded: {} users, {} products, margins 15% global / 20% Metals; snapshot written to {}",
                output.users,
                output.products,
                config.store.snapshot_path.display()
            ),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

struct SeedOutput {
    users: usize,
    products: usize,
}
