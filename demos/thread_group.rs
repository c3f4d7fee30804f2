//! Threaded overview of a directory of raw article files.
//!
//! Run with: cargo run --example thread_group -- path/to/group

use loread::{parse_batch, thread};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let dir = std::env::args().nth(1).unwrap_or_else(|| ".".to_string());

    let mut raws = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if entry.file_type()?.is_file() {
            raws.push(std::fs::read(entry.path())?);
        }
    }

    let articles = parse_batch(&raws);
    println!("{} articles in {}", articles.len(), dir);

    let forest = thread(articles);
    println!("{} threads\n", forest.roots().len());

    for (id, depth) in forest.walk() {
        let container = forest.get(id);
        let subject = container
            .article
            .as_ref()
            .map(|article| article.subject.as_str())
            .unwrap_or("<<empty container>>");
        let author = container
            .article
            .as_ref()
            .and_then(|article| article.header("From"))
            .unwrap_or("");
        println!("{}{} {}", "  ".repeat(depth), subject, author);
    }

    Ok(())
}
