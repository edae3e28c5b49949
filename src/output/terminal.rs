// Colored terminal output for topics, documents and topic correlations.
//
// main.rs delegates all display here. Nothing in this module touches the
// model's state; it only reads the query results.

use colored::Colorize;

use crate::topics::correlation::CorrelationGraph;
use crate::topics::document::Document;
use crate::topics::TopicModel;

use super::{share_bar, truncate_chars};

const BAR_WIDTH: usize = 20;

/// Display each topic's share of tokens and its top words.
pub fn display_topics(model: &TopicModel, top_n: usize) {
    let total: usize = model.tokens_per_topic().iter().sum();

    println!(
        "\n{}",
        format!(
            "=== {} topics after {} sweeps ({} documents, {} words) ===",
            model.num_topics(),
            model.complete_sweeps(),
            model.documents().len(),
            model.vocabulary().size()
        )
        .bold()
    );
    println!();

    if total == 0 {
        println!("  No modeled tokens. Is every word a stopword?");
        return;
    }

    for (topic, &tokens) in model.tokens_per_topic().iter().enumerate() {
        let share = tokens as f64 / total as f64;
        let bar = share_bar(share, BAR_WIDTH);
        let colored_bar = if share >= 0.25 {
            bar.bright_green()
        } else if share >= 0.10 {
            bar.bright_yellow()
        } else {
            bar.bright_blue()
        };

        println!(
            "  {:>3}. {} {:>5.1}%  {} tokens",
            topic,
            colored_bar,
            share * 100.0,
            tokens
        );

        let words: Vec<String> = model
            .topic_words(topic)
            .iter()
            .take(top_n)
            .map(|wc| format!("{} ({})", wc.word, wc.count))
            .collect();
        println!("       {}", words.join(", ").dimmed());
        println!();
    }
}

/// Display documents with their dominant topic and topic histogram.
pub fn display_documents(documents: &[Document], limit: usize) {
    if documents.is_empty() {
        println!("No documents. Every line was empty or had no word tokens.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Documents ({} total) ===", documents.len()).bold()
    );
    println!();

    for doc in documents.iter().take(limit) {
        let dominant = match doc.dominant_topic() {
            Some(t) => format!("topic {t}").bright_green(),
            None => "stopwords only".dimmed(),
        };
        let date = if doc.date.is_empty() {
            String::new()
        } else {
            format!(" [{}]", doc.date)
        };

        println!("  {}{} -> {}", doc.id.bold(), date.dimmed(), dominant);

        let histogram: Vec<String> = doc
            .topic_counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(t, c)| format!("{t}:{c}"))
            .collect();
        println!("      Topics: {}", histogram.join(" "));
        println!("      {}", truncate_chars(&doc.original_text, 100).dimmed());
    }

    if documents.len() > limit {
        println!(
            "\n  {}",
            format!("... {} more not shown", documents.len() - limit).dimmed()
        );
    }
}

/// Display a correlation graph as a node list and a link list.
pub fn display_correlation_graph(graph: &CorrelationGraph, cutoff: f64) {
    println!("\n{}", "=== Topic Correlations ===".bold());
    println!();

    for node in &graph.nodes {
        println!("  {:>3}. {}", node.topic_id, node.top_words.join(" ").bold());
    }
    println!();

    if graph.links.is_empty() {
        println!("  No topic pairs above cutoff {cutoff:.2}.");
        return;
    }

    println!("  {} directed links above cutoff {:.2}:", graph.links.len(), cutoff);
    for link in &graph.links {
        // Each pair appears in both directions; show it once.
        if link.source > link.target {
            continue;
        }
        let weight = format!("{:+.3}", link.weight);
        let colored_weight = if link.weight >= 1.0 {
            weight.bright_green()
        } else {
            weight.yellow()
        };
        println!(
            "    {:>3} <-> {:<3} {}",
            link.source, link.target, colored_weight
        );
    }
}
