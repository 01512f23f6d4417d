#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Russian,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Russian];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Russian => "ru",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Russian => "Русский",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "ru" | "russian" => Language::Russian,
            _ => Language::English,
        }
    }
}

/// Translation function - returns localized string based on language
pub fn t(key: &str, lang: Language) -> String {
    match (key, lang) {
        // Access gate
        ("access_title", Language::English) => "🔒 Access key",
        ("access_title", Language::Russian) => "🔒 Ключ доступа",
        ("access_prompt", Language::English) => "Enter the access key to manage the library",
        ("access_prompt", Language::Russian) => "Введите ключ для управления библиотекой",
        ("check_key", Language::English) => "Unlock",
        ("check_key", Language::Russian) => "Войти",
        ("invalid_key", Language::English) => "Invalid key!",
        ("invalid_key", Language::Russian) => "Неверный ключ!",

        // List
        ("search", Language::English) => "🔍 Search",
        ("search", Language::Russian) => "🔍 Поиск",
        ("page", Language::English) => "Page",
        ("page", Language::Russian) => "Страница",
        ("loading", Language::English) => "Loading…",
        ("loading", Language::Russian) => "Загрузка…",
        ("load_failed", Language::English) => "Could not load videos",
        ("load_failed", Language::Russian) => "Не удалось загрузить видео",
        ("empty_list", Language::English) => "📭 No videos",
        ("empty_list", Language::Russian) => "📭 Видео нет",
        ("reload", Language::English) => "⟳ Reload",
        ("reload", Language::Russian) => "⟳ Обновить",

        // Detail panel
        ("no_selection", Language::English) => "Select a video",
        ("no_selection", Language::Russian) => "Выберите видео",
        ("player_failed", Language::English) => "Player could not be started",
        ("player_failed", Language::Russian) => "Не удалось запустить плеер",
        ("rename", Language::English) => "✏ Rename",
        ("rename", Language::Russian) => "✏ Переименовать",
        ("rename_prompt", Language::English) => "New name",
        ("rename_prompt", Language::Russian) => "Новое название",
        ("delete", Language::English) => "🗑 Delete",
        ("delete", Language::Russian) => "🗑 Удалить",
        ("confirm_delete", Language::English) => "Delete this video?",
        ("confirm_delete", Language::Russian) => "Удалить это видео?",
        ("download", Language::English) => "⬇ Download",
        ("download", Language::Russian) => "⬇ Скачать",
        ("copy_link", Language::English) => "🔗 Copy link",
        ("copy_link", Language::Russian) => "🔗 Копировать ссылку",
        ("copied", Language::English) => "✅ Copied to clipboard",
        ("copied", Language::Russian) => "✅ Скопировано",
        ("clipboard_failed", Language::English) => "❌ Clipboard not available",
        ("clipboard_failed", Language::Russian) => "❌ Буфер обмена недоступен",
        ("renamed", Language::English) => "✅ Renamed",
        ("renamed", Language::Russian) => "✅ Переименовано",
        ("deleted", Language::English) => "✅ Video deleted",
        ("deleted", Language::Russian) => "✅ Видео удалено",

        // Upload
        ("upload", Language::English) => "⬆ Upload",
        ("upload", Language::Russian) => "⬆ Загрузить",
        ("choose_file", Language::English) => "📂 Choose file",
        ("choose_file", Language::Russian) => "📂 Выбрать файл",
        ("title", Language::English) => "Title",
        ("title", Language::Russian) => "Название",
        ("uploading", Language::English) => "Uploading…",
        ("uploading", Language::Russian) => "Загрузка…",
        ("no_file", Language::English) => "Select a file to upload",
        ("no_file", Language::Russian) => "Выберите файл для загрузки",
        ("no_title", Language::English) => "Enter a title",
        ("no_title", Language::Russian) => "Введите название",

        // Recording
        ("recording", Language::English) => "⏺ Stream recording",
        ("recording", Language::Russian) => "⏺ Запись трансляции",
        ("stream_key", Language::English) => "Stream key",
        ("stream_key", Language::Russian) => "Ключ трансляции",
        ("start_recording", Language::English) => "Start",
        ("start_recording", Language::Russian) => "Начать",

        // Settings
        ("settings", Language::English) => "⚙️ Settings",
        ("settings", Language::Russian) => "⚙️ Настройки",
        ("language", Language::English) => "Language",
        ("language", Language::Russian) => "Язык",
        ("save", Language::English) => "💾 Save",
        ("save", Language::Russian) => "💾 Сохранить",
        ("cancel", Language::English) => "❌ Cancel",
        ("cancel", Language::Russian) => "❌ Отмена",
        ("ok", Language::English) => "OK",
        ("ok", Language::Russian) => "ОК",
        ("yes", Language::English) => "Yes",
        ("yes", Language::Russian) => "Да",
        ("no", Language::English) => "No",
        ("no", Language::Russian) => "Нет",
        ("saved", Language::English) => "✅ Settings saved",
        ("saved", Language::Russian) => "✅ Настройки сохранены",
        ("save_failed", Language::English) => "❌ Failed to save settings",
        ("save_failed", Language::Russian) => "❌ Не удалось сохранить настройки",

        // Fallback
        _ => key,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translations_and_fallback() {
        assert_eq!(t("invalid_key", Language::English), "Invalid key!");
        assert_eq!(t("invalid_key", Language::Russian), "Неверный ключ!");
        assert_eq!(t("no_such_key", Language::Russian), "no_such_key");
    }

    #[test]
    fn test_language_parse() {
        assert_eq!(Language::parse("RU"), Language::Russian);
        assert_eq!(Language::parse("de"), Language::English);
        assert_eq!(Language::parse(Language::Russian.as_str()), Language::Russian);
    }
}
