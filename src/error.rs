use thiserror::Error;

#[derive(Error, Debug)]
pub enum TntError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("{program} exited with status {}: {stderr}", exit_label(.code))]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Unknown instance: {0}")]
    UnknownInstance(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Command '{command}' requires --{argument}")]
    MissingArgument { command: String, argument: String },

    #[error("No instances selected for '{0}'; pass instance names, --all or --backend")]
    NoTargets(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not determine IP for {instance}: {message}")]
    Ip { instance: String, message: String },
}

pub type Result<T> = std::result::Result<T, TntError>;

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}
