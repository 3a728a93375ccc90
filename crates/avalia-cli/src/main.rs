//! avalia - course review comments from the command line
//!
//! ## Quick Start
//!
//! ```bash
//! # Write the default configuration
//! avalia config init
//!
//! # Post a comment on a discipline, then reply to it
//! avalia --as ana@unb.br post --discipline CIC0004 "Ótima disciplina"
//! avalia --as bia@unb.br reply 1 "Concordo"
//!
//! # Vote, report and read the thread
//! avalia --as caio@unb.br vote 1 up
//! avalia --as caio@unb.br report 2
//! avalia --as caio@unb.br show 1
//!
//! # Moderate (admin@unb.br listed under [moderation] admins)
//! avalia --as admin@unb.br admin alarming
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
