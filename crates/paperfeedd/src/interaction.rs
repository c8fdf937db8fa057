//! Styled console output for command results.
//!
//! Results go to stdout, errors to stderr. Log lines are written by `tracing` to stderr as well,
//! so piping stdout only captures what the commands print here.

use super::*;

/// Prefix for information messages
pub static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
pub static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for warning messages
pub static WARNING_PREFIX: &str = "! ";
/// Prefix for error messages
pub static ERROR_PREFIX: &str = "✗ ";
/// Branch of a listed item
pub static ITEM_PREFIX: &str = "├─";
/// Last branch of a listed item
pub static LAST_ITEM_PREFIX: &str = "└─";
/// Continuation line for tree structure
pub static CONTINUE_PREFIX: &str = "│  ";
/// Marker for plain lists
pub static BULLET: &str = "•";

/// Something a command wants to show.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// Papers selected from the store
  Papers(&'a [&'a Paper]),
  /// Distinct tags of the store
  Tags(&'a [String]),
  /// Outcome of a pipeline run and the store it wrote to
  Report(&'a RunReport, &'a Path),
  /// A completed action
  Success(&'a str),
  /// Neutral information
  Info(&'a str),
  /// Something the user should know about
  Warning(&'a str),
  /// The error that ends the command
  Error(&'a PaperfeedError),
}

/// Prints `content` to the console.
pub fn reply(content: ResponseContent) {
  match content {
    ResponseContent::Papers(papers) => {
      if papers.is_empty() {
        println!("{}No papers found", style(INFO_PREFIX).blue());
        return;
      }
      println!("{}Found {} papers:", style(SUCCESS_PREFIX).green(), papers.len());
      for paper in papers {
        print_paper(paper);
      }
    },
    ResponseContent::Tags(tags) =>
      if tags.is_empty() {
        println!("{}No tags found", style(INFO_PREFIX).blue());
      } else {
        for tag in tags {
          println!("{} {tag}", style(BULLET).dim());
        }
      },
    ResponseContent::Report(report, path) => print_report(report, path),
    ResponseContent::Success(message) =>
      println!("{}{}", style(SUCCESS_PREFIX).green(), style(message).green()),
    ResponseContent::Info(message) => println!("{}{message}", style(INFO_PREFIX).blue()),
    ResponseContent::Warning(message) =>
      println!("{}{}", style(WARNING_PREFIX).yellow(), style(message).yellow()),
    ResponseContent::Error(error) =>
      eprintln!("{}{}", style(ERROR_PREFIX).red(), style(error).red()),
  }
}

/// One paper as a small tree.
fn print_paper(paper: &Paper) {
  println!();
  println!("{} {}", style(&paper.id).cyan(), style(paper.published_date).dim());
  println!("{} {}", style(ITEM_PREFIX).dim(), style(&paper.title).bold());
  println!("{}   {}", style(CONTINUE_PREFIX).dim(), paper.authors.join(", "));
  println!("{} {}", style(ITEM_PREFIX).dim(), style(paper.tags.join(" ")).yellow());
  let marker = if paper.content.tr != paper.content.en { "" } else { " (no summary)" };
  println!(
    "{} {}{}",
    style(LAST_ITEM_PREFIX).dim(),
    style(&paper.link).underlined(),
    style(marker).dim()
  );
}

/// Counts of a finished run.
fn print_report(report: &RunReport, path: &Path) {
  println!("{}Already stored: {}", style(INFO_PREFIX).blue(), report.existing);
  println!("{}Fetched: {}", style(INFO_PREFIX).blue(), report.fetched);
  println!(
    "{}New: {} ({} summarized, {} kept their abstract)",
    style(INFO_PREFIX).blue(),
    report.fresh,
    report.generated,
    report.fallbacks
  );
  match report.saved {
    Some(saved) => println!(
      "{}{}",
      style(SUCCESS_PREFIX).green(),
      style(format!("Saved {saved} papers to {}", path.display())).green()
    ),
    None => println!(
      "{}{}",
      style(WARNING_PREFIX).yellow(),
      style(format!("Nothing fetched, {} left unchanged", path.display())).yellow()
    ),
  }
}
