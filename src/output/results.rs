//! Result listings.

use console::style;

use crate::view::{Control, ResultBlock, ViewState};

/// Drop control characters so backend text cannot drive the terminal.
fn printable(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}

/// One line per result: title, author, duration and preview kind.
pub fn format_block(index: usize, block: &ResultBlock) -> String {
    let formats: Vec<&str> = block
        .download_formats()
        .iter()
        .map(|f| f.label())
        .collect();
    format!(
        "{:>2}. {} - {} [{}] ({} preview; {}) id={}",
        index + 1,
        printable(&block.title),
        printable(&block.author),
        block.duration_label,
        block.preview.kind.as_str(),
        formats.join("/"),
        printable(&block.id)
    )
}

/// Print a container's state.
pub fn print_view(heading: &str, state: &ViewState) {
    println!();
    println!("{}", style(heading).bold());

    match state {
        ViewState::Idle => {}
        ViewState::Loading(message) | ViewState::Empty(message) => {
            println!("  {}", style(message).dim())
        }
        ViewState::Failed(message) => println!("  {}", style(message).red()),
        ViewState::Results(blocks) => {
            for (index, block) in blocks.iter().enumerate() {
                println!("  {}", format_block(index, block));
                for control in &block.controls {
                    if let Control::ExternalPreview { href } = control {
                        println!("      {}", style(printable(href)).dim());
                    }
                }
            }
        }
    }
}
