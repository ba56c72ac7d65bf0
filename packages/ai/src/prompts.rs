// ABOUTME: Prompt builders for code review, code generation and learning roadmaps
// ABOUTME: Also holds the reviewer system instruction sent with every Gemini request

use codementor_core::RoadmapRequest;

/// System instruction that frames the model as a code reviewer
pub const REVIEWER_INSTRUCTION: &str = r#"You are an expert code reviewer with deep knowledge of software development, best practices and optimization techniques.
Analyze the code you are given, identify its issues and propose the best fixes while keeping the result clear and efficient.

Review process:
1. Identify the problems in the code.
2. Explain what is wrong and why.
3. Propose a solution for each issue.
4. Provide a corrected implementation.
5. Finish with an optimized version.

Areas to cover:
- Readability and structure: clean, modular, well formatted code.
- Performance: redundant operations and inefficient loops.
- Security and error handling: injection, XSS and unchecked failures.
- Maintainability and scalability.

Example of the expected shape:

Bad code:
```python
def process(data):
    result = []
    for i in range(len(data)):
        result.append(data[i] * 2)
    return result
```

Issues:
- Inefficient loop: iterates over `range(len(data))` instead of the items.
- Unnecessary list initialization.

Solution:
- Use a list comprehension.

Corrected code:
```python
def process(data):
    return [item * 2 for item in data]
```

Always explain what is wrong and how to fix it. Keep feedback structured, concise and actionable, following the order Bad Code, Issues, Solution, Corrected Code, Optimized Code."#;

/// Prompt asking the model to review `code`
pub fn review_prompt(code: &str) -> String {
    format!(
        "Review the following code. Use headings named \"Issues\" and \"Solution\" \
         with one bullet point per item.\n\n```\n{}\n```",
        code
    )
}

/// Prompt asking for a snippet solving `problem` in `language`
pub fn codegen_prompt(problem: &str, language: &str) -> String {
    format!(
        r#"You are a coding assistant that generates code snippets on demand.

Rules for your answer:
1. Put the code in a single fenced block tagged with the language (```{language} ... ```).
2. Never wrap code inside JSON objects or escaped strings.
3. Keep the code line by line, indented and ready to copy.
4. Put any explanation outside the code block.
5. If several approaches exist, mention the alternatives briefly and give the most efficient one.

Generate a code snippet in {language} for the following problem: "{problem}".
Provide a short explanation of how the code works."#
    )
}

/// Prompt asking for a day-by-day learning plan as strict JSON
pub fn roadmap_prompt(request: &RoadmapRequest) -> String {
    let daily_time = request
        .daily_time
        .as_deref()
        .map(|t| format!("The learner can spend {} per day.\n", t))
        .unwrap_or_default();

    format!(
        r#"Create a {duration}-day learning roadmap for "{field}" aimed at a {level} learner.
{daily_time}
Respond with JSON only, no prose and no code fences, using exactly this shape:
{{
  "days": [
    {{
      "day": 1,
      "title": "short title",
      "objectives": ["objective"],
      "task": "hands-on task for the day",
      "resources": ["link or book"],
      "practiceQuestions": ["question"],
      "tip": "one practical tip",
      "nextDayHint": "what comes next"
    }}
  ]
}}
Return exactly {duration} entries in "days", numbered from 1."#,
        duration = request.duration,
        field = request.field,
        level = request.skill_level,
        daily_time = daily_time,
    )
}
