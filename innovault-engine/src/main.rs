use clap::Parser;

use innovault_engine::config::CliArgs;
use innovault_engine::notifier::{LogNotifier, Notifier, OutboxNotifier};
use innovault_engine::policy::PlagiarismPolicy;
use innovault_engine::server::VaultServer;
use innovault_engine::store::SubmissionStore;
use innovault_engine::text_source::PlainTextSource;
use innovault_engine::transport::NdjsonTransport;
use innovault_engine::vault::Vault;

fn main() {
	let args = CliArgs::parse();

	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
		)
		.init();

	let store = match SubmissionStore::open(args.store_config()) {
		Ok(store) => store,
		Err(e) => {
			tracing::error!("Failed to open submission store: {}", e);
			std::process::exit(1);
		}
	};

	let notifier: Box<dyn Notifier> = match &args.outbox {
		Some(path) => Box::new(OutboxNotifier::new(path)),
		None => Box::new(LogNotifier),
	};

	let vault = Vault::new(store, PlagiarismPolicy::new(args.policy_config()), notifier);
	let mut server = VaultServer::new(NdjsonTransport::new(), vault, Box::new(PlainTextSource));

	tracing::info!("innovault-engine ready");

	if let Err(e) = server.run() {
		tracing::error!("Server error: {}", e);
		std::process::exit(1);
	}
}
