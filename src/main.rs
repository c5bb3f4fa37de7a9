use std::io::{BufRead, Write};
use std::process::ExitCode;

use dotenv::dotenv;
use tracing_subscriber::filter::LevelFilter;
use wallet_verifier::{
    config::Config,
    models::walletmodels::{AdminLoginRequest, AdminLoginResponse},
    AdminWalletAuth,
};

fn main() -> ExitCode {
    dotenv().ok();

    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::init();
    let auth = AdminWalletAuth::new(&config);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    match serve(&auth, stdin.lock(), stdout.lock()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("🔥 I/O error while serving login requests: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Answers one JSON login request per input line with one JSON verdict per
/// output line, sharing `auth` (and its throttle) across the whole stream.
/// Returns whether every request was authenticated.
fn serve<R: BufRead, W: Write>(auth: &AdminWalletAuth, input: R, mut output: W) -> std::io::Result<bool> {
    let mut all_ok = true;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<AdminLoginRequest>(&line) {
            Ok(login) => match auth.authenticate_from(login.client_id.as_deref(), &login.request) {
                Ok(address) => AdminLoginResponse::success(address.to_hex()),
                Err(e) => {
                    tracing::info!("Admin login rejected with status {}", e.status_code());
                    AdminLoginResponse::fail(e.to_string())
                }
            },
            Err(e) => {
                tracing::error!("🔥 Invalid request body: {}", e);
                AdminLoginResponse::fail("Invalid request body")
            }
        };

        all_ok &= response.status == "success";
        match serde_json::to_string(&response) {
            Ok(body) => writeln!(output, "{}", body)?,
            Err(e) => tracing::error!("🔥 Failed to serialize response: {}", e),
        }
        output.flush()?;
    }
    Ok(all_ok)
}
