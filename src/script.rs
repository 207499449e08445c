//! Turns a user's command script (USER<i>) into a stream of commands.
use crate::constants::USER_SCRIPT_PREFIX;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio_util::codec::FramedRead;

mod script_codec;
pub use script_codec::ScriptCodec;

mod script_parser;
pub use script_parser::ScriptError;
pub use script_parser::ScriptParser;

pub fn script_path(script_dir: &Path, user_id: usize) -> PathBuf {
    script_dir.join(format!("{}{}", USER_SCRIPT_PREFIX, user_id))
}

/// Opens a script file, the returned stream yields one command per line
pub async fn open_script(path: &Path) -> Result<FramedRead<File, ScriptCodec>, ScriptError> {
    let file = File::open(path)
        .await
        .map_err(|e| ScriptError::OpenError(path.to_string_lossy().to_string(), e))?;
    Ok(FramedRead::new(file, ScriptCodec::new()))
}
