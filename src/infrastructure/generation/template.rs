use crate::domain::entities::ranked::RankedRestaurant;
use crate::domain::error::DomainError;
use crate::domain::ports::response_generator::ResponseGenerator;
use crate::infrastructure::generation::PICKS;
use async_trait::async_trait;

/// Deterministic plain-text answer built only from the ranked fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn new() -> Self {
        Self
    }

    fn reason(r: &RankedRestaurant) -> String {
        let mut reasons = Vec::new();
        if let Some(cuisine) = r.restaurant.cuisine.as_deref().filter(|c| !c.is_empty()) {
            reasons.push(format!("it serves {cuisine}"));
        }
        if let Some(d) = r.distance_km {
            reasons.push(format!("it is {d:.1} km away"));
        }
        if let Some(rating) = r.restaurant.rating {
            match r.restaurant.rating_text.as_deref().filter(|t| !t.is_empty()) {
                Some(text) => reasons.push(format!("it is rated {rating:.1} ({text})")),
                None => reasons.push(format!("it is rated {rating:.1}")),
            }
        }
        if reasons.is_empty() {
            return "it closely matches what you asked for".to_string();
        }
        join_reasons(&reasons)
    }
}

fn join_reasons(reasons: &[String]) -> String {
    match reasons {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

#[async_trait]
impl ResponseGenerator for TemplateGenerator {
    fn name(&self) -> &str {
        "template"
    }

    async fn generate(&self, query: &str, results: &[RankedRestaurant]) -> Result<String, DomainError> {
        let picks = &results[..results.len().min(PICKS)];
        let mut lines = Vec::with_capacity(picks.len() + 1);
        lines.push(match picks.len() {
            1 => format!("For '{query}', here is the best option nearby."),
            n => format!("For '{query}', here are the best {n} options nearby."),
        });
        for (i, r) in picks.iter().enumerate() {
            lines.push(format!("{}. {}: chosen because {}.", i + 1, r.restaurant.name, Self::reason(r)));
        }
        Ok(lines.join("\n"))
    }
}
