// Entrypoint for the CLI application.
// - Keeps `main` small: create an API client and hand it to the UI loop.
// - Returns `anyhow::Result` to simplify error handling for the prototype.

use livebid_cli::{api::ApiClient, ui::main_menu};

fn main() -> anyhow::Result<()> {
    // Client configured by the `LIVEBID_URL` environment variable, or the
    // default http://localhost:8080. See `api::ApiClient::from_env`.
    let api = ApiClient::from_env()?;

    // Start the interactive menu. This call blocks until the user exits.
    main_menu(api)?;
    Ok(())
}
