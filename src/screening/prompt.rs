use super::record::ArticleRecord;

pub const SYSTEM_PROMPT: &str = "You are a research assistant specialized in academic paper selection. \
When given a CSV file containing information about research papers, \
your task is to include or exclude each paper based on specified criteria.";

/// Builds the user message for one article. Field values are embedded verbatim.
pub fn build_screening_prompt(record: &ArticleRecord) -> String {
    indoc::formatdoc! {"
        Please determine whether the following article should be excluded based on the following criteria:

        Exclusion Criteria:

        1) Animal study (research conducted on non-human animals).
        2) Research category belongs to congress, erratum, letter, note, narrative review meaning that study that is not original study.
        3) Articles related with retraction or belongs to grey literature.
        4) The research is not written in Korean or English (this should be based explicitly on the title or abstract indicating the language is neither Korean nor English).
        5) Systematic review.
        6) Any case study, and case series.

        Article details:

        Title: {title}
        Authors: {author}
        Year: {year}
        Abstract: {abstract_text}

        If the abstract is not provided or empty, try to classify the exclusion criteria based on the title.
        Important notes:
        - Articles that involve **human clinical studies** should not be excluded under criterion 1 unless it is explicitly stated that the research is an animal study.
        - If the abstract is unavailable or empty, it should not automatically result in exclusion under criterion 4. Base the decision on clear evidence from the title indicating that the article is not written in Korean or English.
        - If none of the exclusion criteria explicitly apply, the article should be **included** by default.
        - If the article is to be excluded, specify the exclusion criterion number(s) and copy the relevant sentence(s) from the title or abstract that justify the decision into the <Reason for decision> field.
        - Even if the abstract is not provided, it does not mean that it may not be written in Korean or English, make decision based on title.
        - If the article is to be included, put **no reason** in <Reason for decision> field.

        Format your answer according to the following:
        ###
        Reason for exclusion: {{None,1,2,3,4,5,6}}
        Final decision: {{Include,Exclude}}
        Reason for decision:
        ###
        ",
        title = record.title,
        author = record.author,
        year = record.year,
        abstract_text = record.abstract_text,
    }
}
