use indicatif::{ProgressBar, ProgressStyle};

/// Byte progress over a source of known size, or a spinner when the size is unknown.
pub fn create_progress_bar_bytes(quiet_mode: bool, msg: &str, length: Option<u64>) -> ProgressBar {
    let bar = match quiet_mode {
        true => ProgressBar::hidden(),
        false => match length {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::new_spinner(),
        },
    };

    bar.set_message(msg);
    match length.is_some() {
        true => bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {msg} [{wide_bar:.cyan/blue}] {bytes}/{total_bytes}")
                .progress_chars("=> "),
        ),
        false => bar.set_style(
            ProgressStyle::default_spinner().template("[{elapsed_precise}] {msg} {spinner:.green}"),
        ),
    };

    bar.inc(0); // Just to avoid the drawing after the log.

    bar
}
