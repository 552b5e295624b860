use std::process::ExitCode;

fn main() -> ExitCode {
    maestro_mcp_client::infra::logging::init();
    maestro_mcp_client::cli::run()
}
