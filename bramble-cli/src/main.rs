//! Bramble CLI - renders an HTML file (plus optional stylesheet) to a PNG.
//!
//! Usage:
//!   bramble page.html                      Render to render.png
//!   bramble page.html --css extra.css      Apply a standalone stylesheet
//!   bramble page.html --width 640 --height 480 -o out.png
//!   bramble page.html --layout             Dump the layout tree as JSON
//!   bramble page.html --styles             Dump the styled tree

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;

use bramble_browser::{FontStore, FontTextMeasurer, LoadedDocument, load_document};
use bramble_css::StyledNode;

#[derive(Parser)]
#[command(
    name = "bramble",
    about = "Miniature HTML/CSS engine: renders an HTML file to a PNG"
)]
struct Args {
    /// HTML file to render
    html_file: PathBuf,

    /// Extra stylesheet file, applied after the document's inline styles
    #[arg(long)]
    css: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1000)]
    width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Output PNG path
    #[arg(short, long, default_value = "render.png")]
    out: PathBuf,

    /// Print the laid-out tree as JSON instead of rendering
    #[arg(long)]
    layout: bool,

    /// Print the styled tree instead of rendering
    #[arg(long)]
    styles: bool,

    /// Print the parsed document tree instead of rendering
    #[arg(long)]
    dom: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let doc = load_document(&args.html_file, args.css.as_deref())
        .with_context(|| format!("loading '{}'", args.html_file.display()))?;

    if args.dom {
        bramble_browser::html::print_tree(&doc.dom, doc.dom.root(), 0);
        return Ok(());
    }

    if args.styles {
        print_styled(&doc.styled, 0);
        return Ok(());
    }

    if args.layout {
        dump_layout(&doc, args.width, args.height)?;
        return Ok(());
    }

    let fonts = FontStore::load_system();
    let base_dir = args
        .html_file
        .parent()
        .map_or_else(|| Path::new(".").to_path_buf(), Path::to_path_buf);
    let canvas = doc.render(args.width, args.height, &fonts, &base_dir);
    canvas
        .save(&args.out)
        .with_context(|| format!("saving '{}'", args.out.display()))?;

    println!(
        "{} {} ({}x{}) -> {}",
        "rendered".green().bold(),
        args.html_file.display(),
        args.width,
        args.height,
        args.out.display()
    );
    Ok(())
}

/// Lay the document out and print the tree as JSON.
fn dump_layout(doc: &LoadedDocument, width: u32, height: u32) -> Result<()> {
    let fonts = FontStore::load_system();
    let measurer = FontTextMeasurer::new(&fonts);
    let root = doc.layout(width as i32, height as i32, &measurer);
    println!("{}", serde_json::to_string_pretty(&root)?);
    Ok(())
}

/// Print an indented outline of the styled tree with its property maps.
fn print_styled(node: &StyledNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let properties: Vec<String> = node
        .specified()
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect();
    println!(
        "{indent}{} {{ {} }}",
        format!("node#{}", node.node().0).cyan(),
        properties.join("; ")
    );
    for child in node.children() {
        print_styled(child, depth + 1);
    }
}
