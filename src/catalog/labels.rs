/// Unit labels for one language, already in their display form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelBundle {
    /// Label under the days cell.
    pub days: &'static str,
    /// Label under the hours cell.
    pub hours: &'static str,
    /// Label under the minutes cell.
    pub minutes: &'static str,
    /// Label under the seconds cell.
    pub seconds: &'static str,
}

impl LabelBundle {
    /// Labels in display order: days, hours, minutes, seconds.
    pub fn in_order(&self) -> [&'static str; 4] {
        [self.days, self.hours, self.minutes, self.seconds]
    }
}

/// Supported label languages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
    It,
    Pt,
    Ru,
    Zh,
    Ja,
    Ko,
    Nl,
    Pl,
    Cs,
    Sv,
    Da,
    Fi,
    No,
    Hu,
    El,
    Ro,
    Bg,
    Hr,
    Sk,
    Sl,
}

impl Language {
    /// Every supported language, `En` first.
    pub const ALL: [Language; 24] = [
        Language::En,
        Language::Es,
        Language::Fr,
        Language::De,
        Language::It,
        Language::Pt,
        Language::Ru,
        Language::Zh,
        Language::Ja,
        Language::Ko,
        Language::Nl,
        Language::Pl,
        Language::Cs,
        Language::Sv,
        Language::Da,
        Language::Fi,
        Language::No,
        Language::Hu,
        Language::El,
        Language::Ro,
        Language::Bg,
        Language::Hr,
        Language::Sk,
        Language::Sl,
    ];

    /// Two-letter locale code.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::It => "it",
            Language::Pt => "pt",
            Language::Ru => "ru",
            Language::Zh => "zh",
            Language::Ja => "ja",
            Language::Ko => "ko",
            Language::Nl => "nl",
            Language::Pl => "pl",
            Language::Cs => "cs",
            Language::Sv => "sv",
            Language::Da => "da",
            Language::Fi => "fi",
            Language::No => "no",
            Language::Hu => "hu",
            Language::El => "el",
            Language::Ro => "ro",
            Language::Bg => "bg",
            Language::Hr => "hr",
            Language::Sk => "sk",
            Language::Sl => "sl",
        }
    }

    /// Exact code lookup (case-insensitive); `None` when unsupported.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(code))
    }

    /// Total lookup: unknown or empty codes resolve to [`Language::En`].
    pub fn resolve(code: &str) -> Self {
        Self::from_code(code).unwrap_or_else(|| {
            if !code.trim().is_empty() {
                tracing::debug!(language = code, "unsupported language, using en");
            }
            Language::En
        })
    }

    /// Static labels for this language.
    pub fn labels(self) -> LabelBundle {
        let (days, hours, minutes, seconds) = match self {
            Language::En => ("Days", "Hours", "Minutes", "Seconds"),
            Language::Es => ("Días", "Horas", "Minutos", "Segundos"),
            Language::Fr => ("Jours", "Heures", "Minutes", "Secondes"),
            Language::De => ("Tage", "Stunden", "Minuten", "Sekunden"),
            Language::It => ("Giorni", "Ore", "Minuti", "Secondi"),
            Language::Pt => ("Dias", "Horas", "Minutos", "Segundos"),
            Language::Ru => ("Дней", "Часов", "Минут", "Секунд"),
            Language::Zh => ("天", "小时", "分钟", "秒"),
            Language::Ja => ("日", "時間", "分", "秒"),
            Language::Ko => ("일", "시간", "분", "초"),
            Language::Nl => ("Dagen", "Uren", "Minuten", "Seconden"),
            Language::Pl => ("Dni", "Godzin", "Minut", "Sekund"),
            Language::Cs => ("Dní", "Hodin", "Minut", "Sekund"),
            Language::Sv => ("Dagar", "Timmar", "Minuter", "Sekunder"),
            Language::Da => ("Dage", "Timer", "Minutter", "Sekunder"),
            Language::Fi => ("Päivää", "Tuntia", "Minuuttia", "Sekuntia"),
            Language::No => ("Dager", "Timer", "Minutter", "Sekunder"),
            Language::Hu => ("Nap", "Óra", "Perc", "Másodperc"),
            Language::El => ("Ημέρες", "Ώρες", "Λεπτά", "Δευτερόλεπτα"),
            Language::Ro => ("Zile", "Ore", "Minute", "Secunde"),
            Language::Bg => ("Дни", "Часа", "Минути", "Секунди"),
            Language::Hr => ("Dana", "Sati", "Minuta", "Sekundi"),
            Language::Sk => ("Dní", "Hodín", "Minút", "Sekúnd"),
            Language::Sl => ("Dni", "Ur", "Minut", "Sekund"),
        };
        LabelBundle {
            days,
            hours,
            minutes,
            seconds,
        }
    }
}

/// Labels for a language code; never fails (unknown codes use English).
pub fn labels_of(language: &str) -> LabelBundle {
    Language::resolve(language).labels()
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/labels.rs"]
mod tests;
