// ABOUTME: Best-effort extraction of structured data from model output
// ABOUTME: Review, generated code and roadmap parsers that fall back instead of failing

use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use codementor_core::{Roadmap, RoadmapDay, RoadmapRequest};

/// Review returned to the client
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewResult {
    pub review: String,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Code snippet split from its surrounding explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedCode {
    pub code: String,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

lazy_static::lazy_static! {
    // Fenced block: optional language tag, then the body up to the closing fence
    static ref FENCE_REGEX: Regex =
        Regex::new(r"(?s)```([A-Za-z0-9_+#.\-]*)[ \t]*\r?\n(.*?)\r?\n[ \t]*```")
            .expect("fence regex is valid");
}

/// Strip a single surrounding code fence, if the whole text is fenced
fn unfence(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        if let Some(caps) = FENCE_REGEX.captures(trimmed) {
            if let Some(body) = caps.get(2) {
                return body.as_str().trim();
            }
        }
    }
    trimmed
}

/// Parse a JSON value from model output, trying fenced and embedded objects
fn extract_json(text: &str) -> Option<Value> {
    let candidate = unfence(text);
    if let Ok(value) = serde_json::from_str::<Value>(candidate) {
        return Some(value);
    }

    let start = candidate.find('{')?;
    let end = candidate.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&candidate[start..=end]).ok()
}

pub fn parse_review(text: &str) -> ReviewResult {
    if let Some(value @ Value::Object(_)) = extract_json(text) {
        if let Ok(mut parsed) = serde_json::from_value::<ReviewResult>(value) {
            if parsed.review.trim().is_empty() {
                parsed.review = text.trim().to_string();
            }
            return parsed;
        }
    }

    debug!("Review output is not JSON, scraping markdown");

    let (issues, suggestions) = scrape_review_lists(text);
    ReviewResult {
        review: text.to_string(),
        issues,
        suggestions,
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Other,
    Issues,
    Suggestions,
}

fn heading_section(line: &str) -> Option<Section> {
    if is_bullet(line) {
        return None;
    }

    // Headings may lead with an emoji or other marker, e.g. "❌ **Issues:**"
    let line = line.trim_start_matches(|c: char| !(c.is_alphanumeric() || c == '#' || c == '*'));
    let is_heading = line.starts_with('#')
        || (line.starts_with("**") && line.trim_end_matches(':').ends_with("**"))
        || line.ends_with(':');
    if !is_heading {
        return None;
    }

    let lower = line.to_lowercase();
    if lower.contains("issue") || lower.contains("problem") {
        Some(Section::Issues)
    } else if ["solution", "suggest", "recommend", "improvement"]
        .iter()
        .any(|k| lower.contains(k))
    {
        Some(Section::Suggestions)
    } else {
        Some(Section::Other)
    }
}

fn is_bullet(line: &str) -> bool {
    bullet_text(line).is_some()
}

fn bullet_text(line: &str) -> Option<&str> {
    for marker in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest);
        }
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return Some(rest);
        }
    }
    None
}

fn scrape_review_lists(text: &str) -> (Vec<String>, Vec<String>) {
    let mut issues = Vec::new();
    let mut suggestions = Vec::new();
    let mut section = Section::Other;
    let mut in_fence = false;

    for raw in text.lines() {
        let line = raw.trim();

        if line.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence || line.is_empty() {
            continue;
        }

        if let Some(next) = heading_section(line) {
            section = next;
            continue;
        }

        let Some(item) = bullet_text(line) else {
            continue;
        };
        let item = item.trim().to_string();
        if item.is_empty() {
            continue;
        }

        match section {
            Section::Issues => issues.push(item),
            Section::Suggestions => suggestions.push(item),
            Section::Other => {}
        }
    }

    (issues, suggestions)
}

pub fn parse_generated_code(text: &str) -> GeneratedCode {
    let Some(caps) = FENCE_REGEX.captures(text) else {
        return GeneratedCode {
            code: text.trim().to_string(),
            explanation: String::new(),
            language: None,
        };
    };

    // Both groups always participate in a match
    let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
    let code = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
    let language = caps
        .get(1)
        .map(|m| m.as_str())
        .filter(|tag| !tag.is_empty())
        .map(str::to_string);

    let mut explanation = String::with_capacity(text.len());
    explanation.push_str(&text[..whole.start]);
    explanation.push_str(&text[whole.end..]);

    GeneratedCode {
        code: code.to_string(),
        explanation: explanation.trim().to_string(),
        language,
    }
}

/// Build a roadmap from model output. Days are renumbered from 1, cut to the
/// requested duration and padded with placeholder days when the model
/// returned fewer.
pub fn parse_roadmap(text: &str, request: &RoadmapRequest) -> Roadmap {
    let raw_days = match extract_json(text).or_else(|| extract_json_array(text)) {
        Some(Value::Object(mut map)) => match map.remove("days") {
            Some(Value::Array(days)) => days,
            _ => Vec::new(),
        },
        Some(Value::Array(days)) => days,
        _ => Vec::new(),
    };

    if raw_days.is_empty() {
        warn!("Roadmap output had no usable days, using default plan");
    }

    let mut days: Vec<RoadmapDay> = raw_days
        .into_iter()
        .filter_map(|value| lenient_day(&value))
        .take(request.duration as usize)
        .collect();

    while days.len() < request.duration as usize {
        days.push(default_day(request, days.len() as u32 + 1));
    }

    for (index, day) in days.iter_mut().enumerate() {
        day.day = index as u32 + 1;
        day.completed = false;
        if day.title.trim().is_empty() {
            day.title = format!("{} - Day {}", request.field, day.day);
        }
    }

    Roadmap {
        field: request.field.clone(),
        duration: request.duration,
        skill_level: request.skill_level.clone(),
        daily_time: request.daily_time.clone(),
        days,
        created_at: Utc::now(),
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| map.get(*key))
}

fn lenient_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// A list field, accepting a lone string as a one-item list
fn lenient_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| lenient_text(Some(item)))
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

/// Read one day field by field so a single mistyped field only loses itself
fn lenient_day(value: &Value) -> Option<RoadmapDay> {
    let Value::Object(map) = value else {
        return None;
    };

    let day = match map.get("day") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .and_then(|n| u32::try_from(n).ok())
    .unwrap_or_default();

    Some(RoadmapDay {
        day,
        title: lenient_text(map.get("title")),
        objectives: lenient_list(map.get("objectives")),
        task: lenient_text(map.get("task")),
        resources: lenient_list(map.get("resources")),
        practice_questions: lenient_list(lookup(
            map,
            &["practiceQuestions", "practice_questions"],
        )),
        tip: lenient_text(map.get("tip")),
        next_day_hint: lenient_text(lookup(map, &["nextDayHint", "next_day_hint"])),
        completed: false,
    })
}

fn extract_json_array(text: &str) -> Option<Value> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

fn default_day(request: &RoadmapRequest, day: u32) -> RoadmapDay {
    RoadmapDay {
        day,
        title: format!("{} - Day {}", request.field, day),
        objectives: vec![format!(
            "Continue building {} skills at the {} level",
            request.field, request.skill_level
        )],
        task: format!("Study and practice one new {} topic.", request.field),
        resources: vec![format!("Official {} documentation", request.field)],
        practice_questions: vec![format!(
            "What did you learn about {} today?",
            request.field
        )],
        tip: "Write down what you learned before moving on.".to_string(),
        next_day_hint: "Build on today's topic.".to_string(),
        completed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request(duration: u32) -> RoadmapRequest {
        RoadmapRequest {
            field: "Rust".to_string(),
            duration,
            skill_level: "beginner".to_string(),
            daily_time: None,
        }
    }

    #[test]
    fn test_parse_review_json() {
        let text = r#"{"review":"Looks fine","issues":["a"],"suggestions":["b"]}"#;
        assert_eq!(
            parse_review(text),
            ReviewResult {
                review: "Looks fine".to_string(),
                issues: vec!["a".to_string()],
                suggestions: vec!["b".to_string()],
            }
        );
    }

    #[test]
    fn test_parse_review_fenced_json() {
        let text = "```json\n{\"review\":\"ok\",\"issues\":[]}\n```";
        let parsed = parse_review(text);
        assert_eq!(parsed.review, "ok");
        assert!(parsed.suggestions.is_empty());
    }

    #[test]
    fn test_parse_review_markdown_fallback() {
        let text = "\
Overall the code works.

### Issues in the Code:
- **Inefficient loop:** uses range(len(data))
- Unused variable

```python
- not a bullet
```

### Solution:
* Use a list comprehension
1. Remove the variable

Corrected code follows.";

        let parsed = parse_review(text);
        assert_eq!(parsed.review, text);
        assert_eq!(
            parsed.issues,
            vec![
                "**Inefficient loop:** uses range(len(data))".to_string(),
                "Unused variable".to_string(),
            ]
        );
        assert_eq!(
            parsed.suggestions,
            vec![
                "Use a list comprehension".to_string(),
                "Remove the variable".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_review_emoji_headings() {
        let text = "\
❌ **Issues in the Code:**
- **Inefficient Loop:** Uses `range(len(data))` instead of direct iteration.
- **Poor Readability:** The logic can be simplified.

🔧 **Solution:**
- Use **list comprehension** to make it more efficient.

✅ **Corrected Code:**
```python
def process(data):
    return [item * 2 for item in data]
```";

        let parsed = parse_review(text);
        assert_eq!(
            parsed.issues,
            vec![
                "**Inefficient Loop:** Uses `range(len(data))` instead of direct iteration."
                    .to_string(),
                "**Poor Readability:** The logic can be simplified.".to_string(),
            ]
        );
        assert_eq!(
            parsed.suggestions,
            vec!["Use **list comprehension** to make it more efficient.".to_string()]
        );
    }

    #[test]
    fn test_parse_review_plain_text() {
        let parsed = parse_review("Nothing to add.");
        assert_eq!(parsed.review, "Nothing to add.");
        assert!(parsed.issues.is_empty());
        assert!(parsed.suggestions.is_empty());
    }

    #[test]
    fn test_parse_generated_code() {
        let text = "Here you go:\n\n```rust\nfn main() {\n    println!(\"hi\");\n}\n```\n\nPrints hi.";
        let parsed = parse_generated_code(text);

        assert_eq!(parsed.code, "fn main() {\n    println!(\"hi\");\n}");
        assert_eq!(parsed.explanation, "Here you go:\n\n\n\nPrints hi.");
        assert_eq!(parsed.language.as_deref(), Some("rust"));
    }

    #[test]
    fn test_parse_generated_code_symbol_language_tag() {
        let parsed = parse_generated_code("```c++\nint main() {}\n```");
        assert_eq!(parsed.code, "int main() {}");
        assert_eq!(parsed.explanation, "");
        assert_eq!(parsed.language.as_deref(), Some("c++"));
    }

    #[test]
    fn test_parse_generated_code_without_fence() {
        let parsed = parse_generated_code("  print('hi')  \n");
        assert_eq!(
            parsed,
            GeneratedCode {
                code: "print('hi')".to_string(),
                explanation: String::new(),
                language: None,
            }
        );
    }

    #[test]
    fn test_parse_roadmap_json() {
        let text = r#"```json
{"days":[
  {"day":5,"title":"Ownership","objectives":["borrowing"],"practiceQuestions":["q"],"completed":true},
  {"title":"Traits","task":"write a trait"}
]}
```"#;

        let roadmap = parse_roadmap(text, &request(2));

        assert_eq!(roadmap.days.len(), 2);
        assert_eq!(roadmap.days[0].day, 1);
        assert_eq!(roadmap.days[0].title, "Ownership");
        assert_eq!(roadmap.days[0].practice_questions, vec!["q".to_string()]);
        assert!(!roadmap.days[0].completed);
        assert_eq!(roadmap.days[1].day, 2);
        assert_eq!(roadmap.days[1].task, "write a trait");
    }

    #[test]
    fn test_parse_roadmap_truncates_and_pads() {
        let text = r#"Sure! [{"title":"A"},{"title":"B"},{"title":"C"}]"#;

        let short = parse_roadmap(text, &request(2));
        assert_eq!(short.days.len(), 2);
        assert_eq!(short.days[1].title, "B");

        let long = parse_roadmap(text, &request(5));
        assert_eq!(long.days.len(), 5);
        assert_eq!(long.days[4].day, 5);
        assert_eq!(long.days[4].title, "Rust - Day 5");
    }

    #[test]
    fn test_parse_roadmap_keeps_days_with_mistyped_fields() {
        let text = r#"{"days":[
  {"day":"1","title":"Ownership deep dive","objectives":"Understand borrowing","resources":[7,{"url":"x"},"The Book"]},
  {"day":2,"title":{"nested":true},"task":"Write a linked list","tip":42}
]}"#;

        let roadmap = parse_roadmap(text, &request(2));

        let first = &roadmap.days[0];
        assert_eq!(first.day, 1);
        assert_eq!(first.title, "Ownership deep dive");
        assert_eq!(first.objectives, vec!["Understand borrowing".to_string()]);
        assert_eq!(
            first.resources,
            vec!["7".to_string(), "The Book".to_string()]
        );

        let second = &roadmap.days[1];
        assert_eq!(second.title, "Rust - Day 2");
        assert_eq!(second.task, "Write a linked list");
        assert_eq!(second.tip, "42");
        assert!(second.objectives.is_empty());
    }

    #[test]
    fn test_parse_roadmap_garbage_falls_back() {
        let roadmap = parse_roadmap("I cannot help with that.", &request(3));

        assert_eq!(roadmap.field, "Rust");
        assert_eq!(roadmap.duration, 3);
        assert_eq!(
            roadmap.days.iter().map(|d| d.day).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(roadmap.days.iter().all(|d| !d.completed));
    }
}
