//! Built-in essay templates

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Template {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub prompt: &'static str,
    pub category: &'static str,
}

pub const TEMPLATES: &[Template] = &[
    Template {
        id: "1",
        title: "Argumentative Essay",
        description: "Present and defend a clear position on a controversial topic",
        prompt: "Write an argumentative essay about a topic you feel strongly about. Present your \
                 thesis clearly in the introduction, support it with evidence in the body \
                 paragraphs, and address counterarguments.",
        category: "Academic",
    },
    Template {
        id: "2",
        title: "Narrative Essay",
        description: "Tell a compelling personal story with vivid details",
        prompt: "Write a narrative essay about a significant moment in your life that taught you \
                 an important lesson. Use descriptive language and dialogue to bring your story \
                 to life.",
        category: "Creative",
    },
    Template {
        id: "3",
        title: "Compare and Contrast",
        description: "Analyze similarities and differences between two subjects",
        prompt: "Choose two subjects (books, movies, historical figures, etc.) and write an essay \
                 comparing and contrasting them. Organize your essay by either discussing each \
                 subject separately or by comparing specific aspects.",
        category: "Academic",
    },
    Template {
        id: "4",
        title: "Problem-Solution Essay",
        description: "Identify a problem and propose practical solutions",
        prompt: "Identify a problem in your community, school, or society. Describe the problem, \
                 explain its causes and effects, and propose realistic solutions with supporting \
                 evidence.",
        category: "Academic",
    },
];

/// Look up a template by id or (case-insensitive) title
pub fn find(key: &str) -> Option<&'static Template> {
    let key = key.trim();
    TEMPLATES
        .iter()
        .find(|t| t.id == key || t.title.eq_ignore_ascii_case(key))
}
