//! User-facing strings for the two supported locales.

use serde::Deserialize;

/// Display language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ru,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Ru, Language::En];

    /// Name of the language in that language (for the settings toggle)
    pub fn native_name(self) -> &'static str {
        match self {
            Language::Ru => "Русский",
            Language::En => "English",
        }
    }

    pub fn translations(self) -> &'static Translations {
        match self {
            Language::Ru => &RU,
            Language::En => &EN,
        }
    }
}

#[derive(Debug)]
pub struct SetupText {
    pub title: &'static str,
    pub description: &'static str,
    pub step1: &'static str,
    pub step2: &'static str,
    pub step3: &'static str,
    pub understand: &'static str,
}

#[derive(Debug)]
pub struct AboutText {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug)]
pub struct SoundTypeText {
    pub title: &'static str,
    pub infrasound: &'static str,
    pub audible: &'static str,
    pub ultrasound: &'static str,
}

#[derive(Debug)]
pub struct AnalysisText {
    pub title: &'static str,
    pub human: &'static str,
    pub bird: &'static str,
    pub dog: &'static str,
    pub cat: &'static str,
    pub unknown: &'static str,
}

#[derive(Debug)]
pub struct RangesText {
    pub title: &'static str,
    pub low: &'static str,
    pub mid: &'static str,
    pub high: &'static str,
}

/// Every string the UI displays
#[derive(Debug)]
pub struct Translations {
    pub title: &'static str,
    pub setup: SetupText,
    pub about: AboutText,
    pub error: &'static str,
    pub volume: &'static str,
    pub frequency: &'static str,
    pub recording: &'static str,
    pub start: &'static str,
    pub stop: &'static str,
    pub install: &'static str,
    pub settings: &'static str,
    pub language: &'static str,
    pub sound_type: SoundTypeText,
    pub analysis: AnalysisText,
    pub ranges: RangesText,
}

static RU: Translations = Translations {
    title: "Звукометр",
    setup: SetupText {
        title: "Начало работы",
        description: "Для начала работы с приложением, выполните следующие шаги:",
        step1: "Разрешите доступ к микрофону при запросе",
        step2: "Нажмите на кнопку микрофона для начала записи",
        step3: "Наблюдайте за изменениями громкости и частоты в реальном времени",
        understand: "Понятно",
    },
    about: AboutText {
        title: "О приложении",
        description: "Это приложение анализирует звук с микрофона и показывает его характеристики в реальном времени.",
    },
    error: "Пожалуйста, предоставьте доступ к микрофону",
    volume: "Громкость",
    frequency: "Частота",
    recording: "Идет запись...",
    start: "Начать запись",
    stop: "Остановить",
    install: "Установить",
    settings: "Настройки",
    language: "Язык",
    sound_type: SoundTypeText {
        title: "Тип звука",
        infrasound: "Инфразвук",
        audible: "Слышимый звук",
        ultrasound: "Ультразвук",
    },
    analysis: AnalysisText {
        title: "Анализ звука",
        human: "Человеческий голос",
        bird: "Птица",
        dog: "Собака",
        cat: "Кошка",
        unknown: "Неизвестный источник",
    },
    ranges: RangesText {
        title: "Частотные диапазоны",
        low: "Низкие частоты",
        mid: "Средние частоты",
        high: "Высокие частоты",
    },
};

static EN: Translations = Translations {
    title: "Sound Meter",
    setup: SetupText {
        title: "Getting Started",
        description: "To start using the application, follow these steps:",
        step1: "Allow microphone access when prompted",
        step2: "Click the microphone button to start recording",
        step3: "Watch the volume and frequency changes in real-time",
        understand: "Got it",
    },
    about: AboutText {
        title: "About",
        description: "This application analyzes sound from your microphone and shows its characteristics in real-time.",
    },
    error: "Please grant microphone access",
    volume: "Volume",
    frequency: "Frequency",
    recording: "Recording...",
    start: "Start recording",
    stop: "Stop",
    install: "Install",
    settings: "Settings",
    language: "Language",
    sound_type: SoundTypeText {
        title: "Sound Type",
        infrasound: "Infrasound",
        audible: "Audible Sound",
        ultrasound: "Ultrasound",
    },
    analysis: AnalysisText {
        title: "Sound Analysis",
        human: "Human Voice",
        bird: "Bird",
        dog: "Dog",
        cat: "Cat",
        unknown: "Unknown Source",
    },
    ranges: RangesText {
        title: "Frequency Ranges",
        low: "Low Frequencies",
        mid: "Mid Frequencies",
        high: "High Frequencies",
    },
};
