//! Prompt templates.
//!
//! Learners study English; explanations and meanings are given in their
//! native language, Vietnamese.

use std::fmt;

use parla_core::ProficiencyLevel;
use serde::{Deserialize, Serialize};

const NATIVE_LANGUAGE: &str = "Vietnamese";

/// A single request to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: Option<String>,
    pub text: String,
    pub temperature: f32,
    /// Ask the model for a JSON body
    pub json: bool,
}

impl Prompt {
    fn text(text: String) -> Self {
        Self {
            system: None,
            text,
            temperature: 0.7,
            json: false,
        }
    }

    fn json(text: String) -> Self {
        Self {
            system: None,
            text,
            temperature: 0.4,
            json: true,
        }
    }

    fn with_system(mut self, system: String) -> Self {
        self.system = Some(system);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    #[default]
    Conversation,
    Grammar,
    Vocabulary,
    Pronunciation,
}

impl ChatMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Conversation => "conversation",
            ChatMode::Grammar => "grammar",
            ChatMode::Vocabulary => "vocabulary",
            ChatMode::Pronunciation => "pronunciation",
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listening exercise difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    const fn describe(&self) -> &'static str {
        match self {
            Difficulty::Easy => "a simple sentence of 5-7 words using basic vocabulary",
            Difficulty::Medium => "a compound sentence of 8-12 words with linking words",
            Difficulty::Hard => "a long sentence of 13-20 words with a complex structure",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn system_prompt(mode: ChatMode, level: ProficiencyLevel) -> String {
    match mode {
        ChatMode::Conversation => "You are a friendly and helpful English tutor.\n\
             - Answer clearly and concisely.\n\
             - You may answer in English or Vietnamese.\n\
             - Keep a natural, friendly tone and stay on topic.\n\
             Reply as in a normal conversation, without special formatting."
            .to_string(),
        ChatMode::Grammar => format!(
            "You are an English grammar expert. Analyze and correct the grammar of a \
             learner at CEFR level {level}.\n\
             1. Point out each specific mistake\n\
             2. Explain why it is wrong\n\
             3. Give the corrected sentence\n\
             4. Give a similar example\n\
             Explain in both English and {NATIVE_LANGUAGE}."
        ),
        ChatMode::Vocabulary => format!(
            "You are an English vocabulary assistant. Help a CEFR level {level} learner \
             learn new words. For each word give:\n\
             1. Definition (English and {NATIVE_LANGUAGE})\n\
             2. IPA transcription\n\
             3. Part of speech\n\
             4. Two or three example sentences\n\
             5. Synonyms and antonyms\n\
             6. Common collocations"
        ),
        ChatMode::Pronunciation => "You are an English pronunciation coach. Assess the learner's \
             pronunciation and give advice:\n\
             1. Sounds pronounced correctly\n\
             2. Sounds to improve\n\
             3. Word stress\n\
             4. Intonation\n\
             5. Concrete tips for improvement"
            .to_string(),
    }
}

/// One chat turn in the given mode.
pub fn chat(mode: ChatMode, level: ProficiencyLevel, message: &str) -> Prompt {
    Prompt::text(format!("The learner says: {message}")).with_system(system_prompt(mode, level))
}

/// A single sentence to be read aloud for dictation.
pub fn listening_sentence(difficulty: Difficulty) -> Prompt {
    Prompt::text(format!(
        "Write one English sentence for listening practice.\n\
         Difficulty: {}.\n\
         The sentence must be meaningful, realistic and easy to read aloud clearly.\n\
         Reply with the English sentence only, nothing else.",
        difficulty.describe()
    ))
}

/// Explain what the learner got wrong in a dictation.
pub fn dictation_analysis(sentence: &str, answer: &str) -> Prompt {
    Prompt::text(format!(
        "Analyze the listening and writing mistakes of an English learner.\n\n\
         ORIGINAL SENTENCE: {sentence}\n\
         LEARNER WROTE: {answer}\n\n\
         1. Specific mistakes: each wrong word or phrase\n\
         2. Likely cause: similar sounds, vocabulary or grammar\n\
         3. How to fix it, including pronunciation\n\
         4. One tip to improve listening\n\
         Keep it short and answer in {NATIVE_LANGUAGE}."
    ))
}

/// Spell-check a word, verify the learner's meaning, and fill in details.
pub fn vocabulary_enrichment(word: &str, meaning: &str) -> Prompt {
    Prompt::json(format!(
        "A learner wants to add the English word \"{word}\" with the {NATIVE_LANGUAGE} \
         meaning \"{meaning}\".\n\n\
         1. Check the spelling of \"{word}\". If it is misspelled, give the correct word.\n\
         2. Check whether \"{meaning}\" is a correct meaning. If not, give the correct \
            {NATIVE_LANGUAGE} meaning.\n\
         3. Give the standard IPA transcription.\n\
         4. Give a short English definition.\n\
         5. Write one natural example sentence.\n\
         6. Pick one topic: technology, food, business, education, health, travel, sports, \
            music, art, science, nature, entertainment, general.\n\n\
         Reply with exactly this JSON object and nothing else:\n\
         {{\n\
           \"is_spelling_correct\": true,\n\
           \"corrected_word\": \"correct spelling\",\n\
           \"is_meaning_correct\": true,\n\
           \"corrected_meaning\": \"correct {NATIVE_LANGUAGE} meaning\",\n\
           \"meaning_target\": \"short English definition\",\n\
           \"phonetic\": \"/IPA/\",\n\
           \"example\": \"example sentence\",\n\
           \"topic\": \"topic\"\n\
         }}"
    ))
}

/// Human-readable name for a quiz or game topic.
pub fn topic_display_name(topic: &str) -> &str {
    match topic {
        "technology" => "Technology",
        "food" => "Food",
        "business" => "Business",
        "education" => "Education",
        "health" => "Health",
        "travel" => "Travel",
        "sports" => "Sports",
        "music" => "Music",
        "nature" => "Nature",
        "animals" => "Animals",
        "weather" => "Weather",
        "family" => "Family",
        "emotions" => "Emotions",
        "general" => "General",
        other => other,
    }
}

/// Multiple-choice questions about a topic.
pub fn topic_quiz(topic: &str, count: usize) -> Prompt {
    let topic = topic_display_name(topic);
    Prompt::json(format!(
        "Create {count} multiple-choice English vocabulary questions about the topic: {topic}.\n\
         - Each question has one English word and four {NATIVE_LANGUAGE} meanings.\n\
         - Exactly one meaning is correct; the three wrong ones should be plausible.\n\
         - Use common, practical words and mix nouns, verbs and adjectives.\n\n\
         Reply with exactly this JSON array and nothing else:\n\
         [\n\
           {{\n\
             \"word\": \"English word\",\n\
             \"correct_answer\": \"correct meaning\",\n\
             \"wrong_answers\": [\"wrong 1\", \"wrong 2\", \"wrong 3\"],\n\
             \"phonetic\": \"/IPA/\",\n\
             \"example\": \"example sentence\"\n\
           }}\n\
         ]"
    ))
}

/// Word/meaning pairs for the matching game.
pub fn topic_matching_words(topic: &str, count: usize) -> Prompt {
    let topic = topic_display_name(topic);
    Prompt::json(format!(
        "Create {count} simple English words about the topic: {topic}.\n\
         - Common, practical words with short, memorable {NATIVE_LANGUAGE} meanings.\n\
         - Mix parts of speech.\n\n\
         Reply with exactly this JSON array and nothing else:\n\
         [\n\
           {{ \"word\": \"English word\", \"meaning\": \"{NATIVE_LANGUAGE} meaning\" }}\n\
         ]"
    ))
}
