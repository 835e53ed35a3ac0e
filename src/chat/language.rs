use serde::{Deserialize, Serialize};

/// Active language for prompts, UI copy, and the outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[value(alias = "en")]
    English,
    #[value(alias = "hi")]
    Hindi,
}

impl Language {
    #[cfg(test)]
    pub const ALL: &'static [Language] = &[Language::English, Language::Hindi];

    /// Code sent to the answering service
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "हिन्दी",
        }
    }

    pub fn toggled(&self) -> Language {
        match self {
            Language::English => Language::Hindi,
            Language::Hindi => Language::English,
        }
    }

    pub fn copy(&self) -> &'static UiCopy {
        match self {
            Language::English => &ENGLISH_COPY,
            Language::Hindi => &HINDI_COPY,
        }
    }

    /// Predefined questions shown as quick prompts and used for autocomplete
    pub fn corpus(&self) -> &'static [&'static str] {
        match self {
            Language::English => ENGLISH_QUESTIONS,
            Language::Hindi => HINDI_QUESTIONS,
        }
    }
}

/// User-facing strings for one language
#[derive(Debug)]
pub struct UiCopy {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub greeting: &'static str,
    pub placeholder: &'static str,
    pub try_asking: &'static str,
    pub typing: &'static str,
    pub online: &'static str,
    pub offline: &'static str,
    pub offline_notice: &'static str,
    pub busy_notice: &'static str,
    pub reply_failed: &'static str,
    pub transport_failed: &'static str,
}

static ENGLISH_COPY: UiCopy = UiCopy {
    title: "LCB ChatBot 🌱",
    subtitle: "Ask about Navyakosh",
    greeting: "LCB Fertilizer's Query Window. Ask me any queries you have!",
    placeholder: "Type your question...",
    try_asking: "Try asking:",
    typing: "Typing...",
    online: "Online",
    offline: "Offline",
    offline_notice: "AI server is currently offline. Please try again later.",
    busy_notice: "Still answering your last question. Please wait.",
    reply_failed: "Failed to get response. Please try again.",
    transport_failed: "Failed to get response. Please try again later.",
};

static HINDI_COPY: UiCopy = UiCopy {
    title: "LCB चैटबॉट 🌱",
    subtitle: "नव्यकोश के बारे में पूछें",
    greeting: "LCB फ़र्टिलाइज़र की प्रश्न खिड़की। अपना कोई भी सवाल पूछें!",
    placeholder: "अपना प्रश्न लिखें...",
    try_asking: "पूछकर देखें:",
    typing: "लिख रहे हैं...",
    online: "ऑनलाइन",
    offline: "ऑफ़लाइन",
    offline_notice: "AI सर्वर अभी ऑफ़लाइन है। कृपया बाद में प्रयास करें।",
    busy_notice: "पिछले प्रश्न का उत्तर अभी आ रहा है। कृपया प्रतीक्षा करें।",
    reply_failed: "उत्तर नहीं मिल सका। कृपया फिर से प्रयास करें।",
    transport_failed: "उत्तर नहीं मिल सका। कृपया बाद में फिर से प्रयास करें।",
};

const ENGLISH_QUESTIONS: &[&str] = &[
    "What is Navyakosh Organic Fertilizer?",
    "What are the benefits of using Navyakosh?",
    "How do I apply it for Wheat, Maize, and Paddy?",
    "Is it safe for long-term soil health?",
    "Can it replace chemical fertilizers?",
    "How does it improve crop yield?",
    "What kind of results can I expect?",
    "On which crops can it be used?",
    "Where can I buy Navyakosh?",
    "How does it reduce irrigation?",
];

const HINDI_QUESTIONS: &[&str] = &[
    "नव्यकोश जैविक उर्वरक क्या है?",
    "नव्यकोश के उपयोग के क्या लाभ हैं?",
    "गेहूं, मक्का और धान में इसे कैसे डालें?",
    "क्या यह लंबे समय तक मिट्टी के स्वास्थ्य के लिए सुरक्षित है?",
    "क्या यह रासायनिक उर्वरकों की जगह ले सकता है?",
    "यह फसल की पैदावार कैसे बढ़ाता है?",
    "मुझे किस तरह के परिणाम मिल सकते हैं?",
    "इसे किन फसलों पर इस्तेमाल किया जा सकता है?",
    "नव्यकोश कहाँ से खरीदें?",
    "यह सिंचाई को कैसे कम करता है?",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_english() {
        assert_eq!(Language::default(), Language::English);
    }

    #[test]
    fn test_toggle_round_trip() {
        assert_eq!(Language::English.toggled(), Language::Hindi);
        assert_eq!(Language::Hindi.toggled(), Language::English);
    }

    #[test]
    fn test_codes() {
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::Hindi.code(), "hi");
    }

    #[test]
    fn test_corpora_are_parallel() {
        assert_eq!(Language::English.corpus().len(), Language::Hindi.corpus().len());
        for lang in Language::ALL {
            assert!(lang.corpus().iter().all(|q| !q.trim().is_empty()));
        }
    }

    #[test]
    fn test_copy_differs_per_language() {
        assert_ne!(Language::English.copy().greeting, Language::Hindi.copy().greeting);
        assert_ne!(Language::English.copy().offline_notice, Language::Hindi.copy().offline_notice);
    }

    #[test]
    fn test_serde_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            language: Language,
        }
        let parsed: Wrapper = toml::from_str("language = \"hindi\"").unwrap();
        assert_eq!(parsed.language, Language::Hindi);
    }
}
