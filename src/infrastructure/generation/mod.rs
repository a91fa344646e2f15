pub mod openai_chat;
pub mod template;

pub use openai_chat::OpenAiChatGenerator;
pub use template::TemplateGenerator;

use crate::domain::entities::ranked::RankedRestaurant;
use std::fmt::Write;

/// How many results the answer talks about.
pub const PICKS: usize = 3;

pub const SYSTEM_RULES: &str = "You are a restaurant recommendation assistant.
Rules:
- Do not use Markdown.
- Do not invent information.
- Use simple natural language.
- Only use the details given to you.
- Do not create details that are not given to you.";

/// One line per result: name, cuisine and distance.
pub fn restaurant_list(results: &[RankedRestaurant]) -> String {
    let mut list = String::new();
    for r in results {
        let cuisine = r.restaurant.cuisine.as_deref().unwrap_or("unknown cuisine");
        let _ = match r.distance_km {
            Some(d) => writeln!(list, "- {} ({cuisine}), {d:.1} km", r.restaurant.name),
            None => writeln!(list, "- {} ({cuisine}), distance unknown", r.restaurant.name),
        };
    }
    list
}

pub fn user_prompt(query: &str, results: &[RankedRestaurant]) -> String {
    format!(
        "I want food like: '{query}'.\n\nHere are nearby restaurants:\n{}\n\
         Select the best {PICKS} options and explain why each was chosen.\n\
         Do not add details that are not included above.",
        restaurant_list(results)
    )
}
