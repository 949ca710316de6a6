// src/services/prompt_builder.rs

/// The closed set of text-processing tools the summarize endpoint offers.
/// Unknown identifiers land in `Other` and get the generic template instead
/// of failing, so the tool list can grow on the frontend first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tool {
    // Core text tools
    Summarize,
    Humanize,
    Plagiarism,
    Keywords,
    Grammar,
    Paraphrase,
    Tone,
    Expand,
    Simplify,
    // Study & academic
    Citation,
    Flashcards,
    Quiz,
    Exam,
    Outline,
    Notes,
    Vocab,
    // Discipline specialized
    Code,
    Legal,
    Medical,
    Business,
    Math,
    Science,
    Literature,
    History,
    // Premium power tools
    Tutor,
    Research,
    Compare,
    Presentation,
    Resume,
    Scholarship,
    Group,
    Other(String),
}

impl Tool {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "summarize" => Tool::Summarize,
            "humanize" => Tool::Humanize,
            "plagiarism" => Tool::Plagiarism,
            "keywords" => Tool::Keywords,
            "grammar" => Tool::Grammar,
            "paraphrase" => Tool::Paraphrase,
            "tone" => Tool::Tone,
            "expand" => Tool::Expand,
            "simplify" => Tool::Simplify,
            "citation" => Tool::Citation,
            "flashcards" => Tool::Flashcards,
            "quiz" => Tool::Quiz,
            "exam" => Tool::Exam,
            "outline" => Tool::Outline,
            "notes" => Tool::Notes,
            "vocab" => Tool::Vocab,
            "code" => Tool::Code,
            "legal" => Tool::Legal,
            "medical" => Tool::Medical,
            "business" => Tool::Business,
            "math" => Tool::Math,
            "science" => Tool::Science,
            "literature" => Tool::Literature,
            "history" => Tool::History,
            "tutor" => Tool::Tutor,
            "research" => Tool::Research,
            "compare" => Tool::Compare,
            "presentation" => Tool::Presentation,
            "resume" => Tool::Resume,
            "scholarship" => Tool::Scholarship,
            "group" => Tool::Group,
            other => Tool::Other(other.to_string()),
        }
    }
}

/// Knobs shared across templates. `summary_type` doubles as a style selector
/// (tone name, citation style, quiz format) and `summary_length` as a count
/// or percentage depending on the tool. Values are embedded verbatim —
/// out-of-range lengths are not clamped (current behavior, kept on purpose).
#[derive(Debug, Clone)]
pub struct PromptOptions {
    pub summary_type: String,
    pub summary_length: i64,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            summary_type: "paragraph".to_string(),
            summary_length: 50,
        }
    }
}

/// Total function: every (tool, text, options) triple yields a deterministic
/// instruction string for the AI provider.
pub fn build_prompt(tool: &Tool, text: &str, opts: &PromptOptions) -> String {
    let style = &opts.summary_type;
    let length = opts.summary_length;

    match tool {
        Tool::Summarize => format!(
            "Summarize this text:\n\n{text}\n\nPlease summarize as {style} with approximately {length}% length."
        ),
        Tool::Humanize => format!("Rewrite this text in a more natural, human-like way:\n\n{text}"),
        Tool::Plagiarism => format!(
            "Check the following text for plagiarism and provide a short report:\n\n{text}"
        ),
        Tool::Keywords => format!(
            "Extract key keywords and phrases from the following text:\n\n{text}"
        ),
        Tool::Grammar => format!(
            "Check and correct grammar, spelling, and punctuation in this text. Return the corrected version:\n\n{text}"
        ),
        Tool::Paraphrase => format!(
            "Paraphrase this text while keeping the original meaning:\n\n{text}"
        ),
        Tool::Tone => format!("Rewrite this text in a {style} tone:\n\n{text}"),
        Tool::Expand => format!(
            "Expand this text to be more detailed (make it {length}% longer):\n\n{text}"
        ),
        Tool::Simplify => format!("Simplify this text for easier understanding:\n\n{text}"),
        Tool::Citation => format!("Generate {style} style citations for these sources:\n\n{text}"),
        Tool::Flashcards => format!(
            "Create {length} flashcards from this text. Format as: FRONT: [question] BACK: [answer]\n\n{text}"
        ),
        Tool::Quiz => format!(
            "Create a {length}-question {style} quiz from this material. Include answers at the end:\n\n{text}"
        ),
        Tool::Exam => format!(
            "Create exam preparation material from this text including {length} key concepts:\n\n{text}"
        ),
        Tool::Outline => format!("Create a detailed essay outline from this text:\n\n{text}"),
        Tool::Notes => format!("Create organized study notes from this text:\n\n{text}"),
        Tool::Vocab => format!(
            "Extract {length} important vocabulary words with definitions from:\n\n{text}"
        ),
        Tool::Code => format!("Explain this code in simple terms:\n\n{text}"),
        Tool::Legal => format!("Summarize this legal document in plain English:\n\n{text}"),
        Tool::Medical => format!("Explain this medical terminology in simple terms:\n\n{text}"),
        Tool::Business => format!("Analyze this business case study:\n\n{text}"),
        Tool::Math => format!("Solve this math problem step by step:\n\n{text}"),
        Tool::Science => format!("Explain this science concept:\n\n{text}"),
        Tool::Literature => format!("Analyze this literary text:\n\n{text}"),
        Tool::History => format!("Provide historical context for:\n\n{text}"),
        Tool::Tutor => format!(
            "Act as a personal tutor. The user asks: \"{text}\"\n\nProvide clear explanation, examples, and practice questions."
        ),
        Tool::Research => format!(
            "For this topic: \"{text}\"\n\nFind and suggest relevant academic resources and links."
        ),
        Tool::Compare => format!("Compare these two documents/texts:\n\n{text}"),
        Tool::Presentation => format!("Create a presentation script for:\n\n{text}"),
        Tool::Resume => format!("Improve this resume text:\n\n{text}"),
        Tool::Scholarship => format!("Help write a scholarship essay about:\n\n{text}"),
        Tool::Group => format!("Create a group project plan for:\n\n{text}"),
        Tool::Other(tag) => format!("Process this text for {tag}:\n\n{text}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_parse_to_variants() {
        assert_eq!(Tool::parse("summarize"), Tool::Summarize);
        assert_eq!(Tool::parse("flashcards"), Tool::Flashcards);
        assert_eq!(Tool::parse("tutor"), Tool::Tutor);
    }

    #[test]
    fn unknown_tag_falls_back_to_generic_template() {
        let tool = Tool::parse("mindmap");
        assert_eq!(tool, Tool::Other("mindmap".to_string()));

        let prompt = build_prompt(&tool, "some text", &PromptOptions::default());
        assert!(prompt.starts_with("Process this text for mindmap:"));
        assert!(prompt.contains("some text"));
    }

    #[test]
    fn summarize_embeds_type_and_length() {
        let prompt = build_prompt(
            &Tool::Summarize,
            "long article",
            &PromptOptions {
                summary_type: "bullets".to_string(),
                summary_length: 25,
            },
        );
        assert!(prompt.contains("as bullets"));
        assert!(prompt.contains("approximately 25% length"));
    }

    #[test]
    fn out_of_range_length_is_embedded_verbatim() {
        // No server-side clamping; the raw value flows into the prompt.
        let prompt = build_prompt(
            &Tool::Summarize,
            "text",
            &PromptOptions {
                summary_type: "paragraph".to_string(),
                summary_length: 250,
            },
        );
        assert!(prompt.contains("approximately 250% length"));
    }

    #[test]
    fn defaults_are_paragraph_and_fifty() {
        let opts = PromptOptions::default();
        assert_eq!(opts.summary_type, "paragraph");
        assert_eq!(opts.summary_length, 50);
    }
}
