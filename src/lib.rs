// Library root
// ------------
// The `gnotes` binary is a thin wrapper around these modules.
//
// Module responsibilities:
// - `api`: blocking HTTP client for the gopher-notes service (login, me,
//   logout and notes CRUD) with uniform error classification.
// - `token_store`: the session token file under `~/.gnotes`.
// - `cli`: clap argument model.
// - `commands`: one handler per subcommand; output formatting and exit
//   codes.
// - `logging`: tracing subscriber setup.
pub mod api;
pub mod cli;
pub mod commands;
pub mod logging;
pub mod token_store;
