//! Display languages, canned copy and keyboard builders.

use serde::{Deserialize, Serialize};
use telegram_client::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, ReplyKeyboardMarkup,
};

use order_flow::OrderStatus;
use order_store::PaymentMethod;

/// A supported display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lang {
    Ru,
    Uz,
    En,
}

impl Default for Lang {
    fn default() -> Self {
        Lang::Ru
    }
}

impl Lang {
    /// Every supported language, in picker order.
    pub const ALL: [Lang; 3] = [Lang::Ru, Lang::Uz, Lang::En];

    /// Two-letter language code used in action payloads.
    pub fn code(self) -> &'static str {
        match self {
            Lang::Ru => "ru",
            Lang::Uz => "uz",
            Lang::En => "en",
        }
    }

    /// Parse a language code.
    pub fn from_code(code: &str) -> Option<Lang> {
        match code {
            "ru" => Some(Lang::Ru),
            "uz" => Some(Lang::Uz),
            "en" => Some(Lang::En),
            _ => None,
        }
    }

    /// Flag shown on the picker button.
    pub fn flag(self) -> &'static str {
        match self {
            Lang::Ru => "🇷🇺",
            Lang::Uz => "🇺🇿",
            Lang::En => "🇬🇧",
        }
    }

    /// Language name in that language.
    pub fn native_label(self) -> &'static str {
        match self {
            Lang::Ru => "Русский",
            Lang::Uz => "O'zbekcha",
            Lang::En => "English",
        }
    }
}

/// Greeting sent in response to the start command.
pub fn welcome(lang: Lang, name: &str) -> String {
    match lang {
        Lang::Ru => format!(
            "Ассалому алайкум, {name}! 👋\nДобро пожаловать в нашу кухню.\nНажмите «🍽️ Меню», чтобы открыть каталог."
        ),
        Lang::Uz => format!(
            "Assalomu alaykum, {name}! 👋\nOshxonamizga xush kelibsiz.\n«🍽️ Menyu» tugmasini bosib katalogni oching."
        ),
        Lang::En => format!(
            "Hello, {name}! 👋\nWelcome to our kitchen.\nTap «🍽️ Menu» to open the catalog."
        ),
    }
}

/// Confirmation sent after the language was switched.
pub fn lang_changed(lang: Lang) -> &'static str {
    match lang {
        Lang::Ru => "Язык изменён на Русский 🇷🇺",
        Lang::Uz => "Til O'zbekchaga o'zgartirildi 🇺🇿",
        Lang::En => "Language changed to English 🇬🇧",
    }
}

/// Prompt above the language picker.
pub fn choose_lang(lang: Lang) -> &'static str {
    match lang {
        Lang::Ru => "Выберите язык / Tilni tanlang:",
        Lang::Uz => "Tilni tanlang / Выберите язык:",
        Lang::En => "Choose language / Выберите язык:",
    }
}

/// Caption of the menu button.
pub fn menu_button(lang: Lang) -> &'static str {
    match lang {
        Lang::Ru => "🍽️ Меню",
        Lang::Uz => "🍽️ Menyu",
        Lang::En => "🍽️ Menu",
    }
}

/// Caption of the change-language button.
pub fn lang_button(lang: Lang) -> &'static str {
    match lang {
        Lang::Ru => "🌐 Изменить язык",
        Lang::Uz => "🌐 Tilni o'zgartirish",
        Lang::En => "🌐 Change language",
    }
}

/// Warning sent when the storefront entry point is not configured.
pub const STOREFRONT_MISSING: &str = "⚠️ WEBAPP_URL is not configured";

/// Whether `text` is the menu button caption in any language.
pub fn is_menu_button(text: &str) -> bool {
    Lang::ALL.iter().any(|lang| menu_button(*lang) == text)
}

/// Whether `text` is the change-language button caption in any language.
pub fn is_lang_button(text: &str) -> bool {
    Lang::ALL.iter().any(|lang| lang_button(*lang) == text)
}

/// Display label for a payment method.
pub fn payment_label(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Click => "Click",
        PaymentMethod::Payme => "Payme",
        PaymentMethod::Cash => "Наличные",
    }
}

/// Operator-facing status caption for the control message.
pub fn status_line(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Accepted => "📋 Статус: Принят",
        OrderStatus::Preparing => "👨‍🍳 Статус: Готовится",
        OrderStatus::Cooking => "🔥 Статус: Упаковываем",
        OrderStatus::OutForDelivery => "🚗 Статус: В пути к клиенту",
        OrderStatus::Delivered => "✅ Статус: Доставлен",
        OrderStatus::Cancelled => "❌ Статус: Отменён",
    }
}

/// Short operator-facing status label for action acknowledgments.
pub fn status_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Accepted => "📋 Принят",
        OrderStatus::Preparing => "👨‍🍳 Готовится",
        OrderStatus::Cooking => "🔥 Упаковывается",
        OrderStatus::OutForDelivery => "🚗 В пути",
        OrderStatus::Delivered => "✅ Доставлен",
        OrderStatus::Cancelled => "❌ Отменён",
    }
}

/// Group an amount's digits in threes: `1234567` -> `"1 234 567"`.
pub fn format_amount(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// The persistent main keyboard: a menu button (a web-app button when the
/// storefront URL is configured) and a change-language button.
pub fn main_keyboard(lang: Lang, webapp_url: Option<&str>) -> ReplyKeyboardMarkup {
    let menu = match webapp_url {
        Some(url) => KeyboardButton::web_app(menu_button(lang), url),
        None => KeyboardButton::text(menu_button(lang)),
    };
    ReplyKeyboardMarkup::persistent(vec![
        vec![menu],
        vec![KeyboardButton::text(lang_button(lang))],
    ])
}

/// The inline language picker, one button per supported language.
pub fn language_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        Lang::ALL
            .iter()
            .map(|lang| {
                vec![InlineKeyboardButton::callback(
                    format!("{} {}", lang.flag(), lang.native_label()),
                    format!("set_lang_{}", lang.code()),
                )]
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_code_round_trip() {
        for lang in Lang::ALL {
            assert_eq!(Lang::from_code(lang.code()), Some(lang));
        }
        assert_eq!(Lang::from_code("de"), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(950), "950");
        assert_eq!(format_amount(45000), "45 000");
        assert_eq!(format_amount(1234567), "1 234 567");
        assert_eq!(format_amount(-90000), "-90 000");
    }

    #[test]
    fn test_button_captions_recognized_across_languages() {
        assert!(is_menu_button("🍽️ Menyu"));
        assert!(is_lang_button("🌐 Change language"));
        assert!(!is_menu_button("menu"));
    }

    #[test]
    fn test_language_keyboard_payloads() {
        let keyboard = language_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), 3);
        assert_eq!(
            keyboard.inline_keyboard[0][0].callback_data.as_deref(),
            Some("set_lang_ru")
        );
        assert_eq!(
            keyboard.inline_keyboard[2][0].callback_data.as_deref(),
            Some("set_lang_en")
        );
    }

    #[test]
    fn test_main_keyboard_uses_web_app_when_configured() {
        let with_url = main_keyboard(Lang::Ru, Some("https://shop.example"));
        assert!(with_url.keyboard[0][0].web_app.is_some());

        let without = main_keyboard(Lang::Ru, None);
        assert!(without.keyboard[0][0].web_app.is_none());
        assert!(without.resize_keyboard);
    }
}
