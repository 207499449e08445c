use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode};
use spooloslib::config::SimConfig;
use spooloslib::tasks::Command;
use std::time::Duration;

pub fn _init_logging() {
    //Every test in a binary calls this, only the first one gets to set the logger
    let _ = CombinedLogger::init(vec![TermLogger::new(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

/// A config with short delays so the tests don't take minutes
pub fn _fast_config(users: usize, disks: usize, printers: usize) -> SimConfig {
    SimConfig {
        users,
        disks,
        printers,
        sectors_per_disk: 256,
        disk_latency: Duration::from_millis(2),
        print_latency: Duration::from_millis(3),
        ..Default::default()
    }
}

pub fn _lines_for(name: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{} line {}", name, i)).collect()
}

pub fn _save_and_print(name: &str, lines: &[String]) -> Vec<Command> {
    let mut commands = vec![Command::BeginFile(name.to_string())];
    commands.extend(lines.iter().cloned().map(Command::DataLine));
    commands.push(Command::EndFile);
    commands.push(Command::PrintFile(name.to_string()));
    commands
}
