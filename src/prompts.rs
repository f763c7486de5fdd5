use std::collections::HashMap;

use crate::data_models::ResearchMode;

pub const QUERY: &str = "query";
pub const CONTEXT_TEXT: &str = "context_text";
pub const CURRENT_DATE: &str = "current_date";

pub const QUICK_TEMPLATE: &str = r#"
Based on the user's original query, provide a concise summary in short form of the following text. Focus only on query related information, mention the source url, and keep the answer in timeline order.
USER'S QUERY: "{query}"
TEXT TO SUMMARIZE:
---
{context_text}
---
"#;

pub const DEEP_TEMPLATE: &str = r#"
As a meticulous research analyst, your task is to synthesize the information from the provided web search results into a maximally detailed and comprehensive report.
**Current Date:** {current_date}.
**VERY IMPORTANT:** Your top priority is to provide information relevant to this current date and the future. If the user's query is about a recurring event (like an exam), you MUST focus on the upcoming or current event.
**User's Original Query:** "{query}"
**Instructions:**
1. Research the query in depth and explain it in detail without leaving out any topic, adding as much of the detail given in the web pages as possible.
2. Do not give your own opinion; speak only according to the sources. State which source each piece of information came from.
3. Include only query related details, ignore anything unrelated to the topic of the query, and order the detailed summary along the timeline.
**Provided Search Results:**
---
{context_text}
---
"#;

/// System prompt for the html document generator behind the pdf tool.
pub const PDF_MASTER_PROMPT: &str = r#"You are an expert technical document developer. Turn the user's request into a single, complete, print-ready HTML5 document.
Rules:
- Output only the HTML document, starting with <!DOCTYPE html>. No commentary and no markdown.
- Put all styling in one <style> block in <head>; no external stylesheets, fonts, or scripts.
- Use A4 page size with sensible print margins, readable typography, and page-break rules that keep headings with their content.
- Structure the content with a title, headings, paragraphs, lists, and tables where the material calls for them.
- If the request is a topic rather than finished content, write accurate, well-organised content about it."#;

pub fn template_for(mode: ResearchMode) -> &'static str {
    match mode {
        ResearchMode::Deep => DEEP_TEMPLATE,
        ResearchMode::Quick => QUICK_TEMPLATE,
    }
}

pub fn pdf_user_prompt(request_text: &str) -> String {
    format!("User's Request: \"{request_text}\"")
}

/// Renders `template` in a single left-to-right pass. Every `{name}` whose
/// name is a key of `vars` is replaced by its value; substituted text is
/// copied verbatim and never scanned again. Unknown `{...}` sequences are
/// left untouched.
pub fn render(template: &str, vars: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(template.len() + vars.values().map(|v| v.len()).sum::<usize>());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match vars.get(name) {
                    Some(value) => {
                        out.push_str(value);
                        rest = &after[close + 1..];
                    }
                    None => {
                        out.push('{');
                        rest = after;
                    }
                }
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
