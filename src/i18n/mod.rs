//! Internationalization: localized strings for menus, prompts and lists.
//!
//! Uses a simple `t(key, lang)` function for static strings and
//! `format_*()` helpers for strings with interpolation.
//! Supported languages: Russian and English (fallback).

mod format;


pub use format::*;

/// Return a localized static string for `key` in the given `lang`.
/// Falls back to English for unsupported languages.
pub fn t(key: &str, lang: &str) -> &'static str {
    let ru = lang == "Russian";
    match key {
        // --- Main menu ---
        "menu_add_task" => if ru { "➕ Добавить задачу" } else { "➕ Add task" },
        "menu_tasks" => if ru { "📋 Мои задачи" } else { "📋 My tasks" },
        "menu_add_reminder" => if ru { "⏰ Добавить напоминание" } else { "⏰ Add reminder" },
        "menu_reminders" => if ru { "🔔 Мои напоминания" } else { "🔔 My reminders" },
        "menu_my_day" => if ru { "📅 Мой день" } else { "📅 My day" },
        "menu_my_month" => if ru { "📆 Мой месяц" } else { "📆 My month" },
        "menu_events" => if ru { "🎉 События" } else { "🎉 Events" },
        "menu_read" => if ru { "📖 5 минут" } else { "📖 5 minutes" },

        // --- Events submenu ---
        "menu_birthday" => if ru { "🎂 День рождения" } else { "🎂 Birthday" },
        "menu_event" => if ru { "📌 Ивент" } else { "📌 Event" },
        "menu_event_list" => if ru { "📅 Список событий" } else { "📅 Event list" },
        "events_menu" => if ru { "Выберите действие с событиями:" } else { "Choose what to do with events:" },

        // --- Choices ---
        "cancel" => if ru { "Отмена" } else { "Cancel" },
        "choice_today" => if ru { "На сегодня" } else { "For today" },
        "choice_other_day" => if ru { "На другой день" } else { "Another day" },
        "choice_daily" => if ru { "Ежедневно" } else { "Daily" },

        // --- Prompts ---
        "welcome" => if ru {
            "Привет! 👋 Я помогу тебе организовать день и не забывать важное!\n\n\
             Вот что ты можешь делать:\n\
             📝 Добавлять задачи на день, а также планировать их на дни вперед\n\
             ⏰ Ставить напоминания: на день, на предстоящий день или ежедневные\n\
             🎉 Сохранять события, например дни рождения друзей\n\
             📄 Получать файлы для быстрого 5-минутного чтения\n\n\
             Используй кнопки внизу. В любой момент нажми «Отмена», чтобы вернуться в главное меню."
        } else {
            "Hi! 👋 I'll help you organize your day and keep track of what matters.\n\n\
             Here is what you can do:\n\
             📝 Add tasks for today or plan them for later days\n\
             ⏰ Set reminders: for today, for another day, or daily\n\
             🎉 Save events, such as friends' birthdays\n\
             📄 Get a file for a quick 5-minute read\n\n\
             Use the buttons below. Press \"Cancel\" at any time to return to the main menu."
        },
        "ask_task_day" => if ru { "Выберите: задача на сегодня или на другой день?" } else { "Is the task for today or another day?" },
        "ask_task_text_today" => if ru { "✍ Введите задачу на сегодня:" } else { "✍ Enter the task for today:" },
        "ask_task_date" => if ru { "✍ Введите дату в формате ДД.ММ.ГГГГ:" } else { "✍ Enter the date as DD.MM.YYYY:" },
        "ask_task_text_other" => if ru { "✍ Введите текст задачи для указанной даты:" } else { "✍ Enter the task for that date:" },
        "ask_reminder_kind" => if ru { "Выберите тип напоминания:" } else { "Choose the reminder type:" },
        "ask_reminder_text" => if ru { "✍ Введите текст напоминания:" } else { "✍ Enter the reminder text:" },
        "ask_reminder_date" => if ru { "Введите дату напоминания в формате ДД.ММ.ГГГГ:" } else { "Enter the reminder date as DD.MM.YYYY:" },
        "ask_reminder_time" => if ru { "Введите время в формате ЧЧ:ММ (например, 09:30):" } else { "Enter the time as HH:MM (for example, 09:30):" },
        "ask_birthday_name" => if ru { "✍ Введите имя человека (имя и/или фамилия):" } else { "✍ Enter the person's name:" },
        "ask_birthday_date" => if ru { "✍ Теперь введите дату дня рождения в формате ДД.ММ.ГГГГ (например, 26.09.2025):" } else { "✍ Now enter the birthday as DD.MM.YYYY (for example, 26.09.2025):" },
        "ask_event_title" => if ru { "✍ Введите название события:" } else { "✍ Enter the event title:" },
        "ask_event_date" => if ru { "✍ Теперь введите дату события в формате ДД.ММ.ГГГГ:" } else { "✍ Now enter the event date as DD.MM.YYYY:" },

        // --- Validation and failures ---
        "invalid_choice" => if ru { "⚠ Выберите вариант на клавиатуре или нажмите Отмена." } else { "⚠ Pick one of the options on the keyboard or press Cancel." },
        "invalid_date" => if ru { "⚠ Неверный формат даты. Попробуйте ДД.ММ.ГГГГ или нажмите Отмена." } else { "⚠ Invalid date. Use DD.MM.YYYY or press Cancel." },
        "invalid_time" => if ru { "⚠ Неверный формат времени. Попробуйте ЧЧ:ММ или нажмите Отмена." } else { "⚠ Invalid time. Use HH:MM or press Cancel." },
        "empty_text" => if ru { "⚠ Текст не может быть пустым. Попробуйте снова или нажмите Отмена." } else { "⚠ The text cannot be empty. Try again or press Cancel." },
        "save_failed" => if ru { "⚠ Не удалось сохранить. Попробуйте позже." } else { "⚠ Could not save. Please try again later." },
        "action_failed" => if ru { "⚠ Не удалось выполнить действие." } else { "⚠ Could not complete the action." },
        "cancelled" => if ru { "❌ Отменено." } else { "❌ Cancelled." },
        "back_to_menu" => if ru { "Возвращаю в главное меню." } else { "Back to the main menu." },
        "unknown_input" => if ru { "Используй кнопки меню внизу." } else { "Please use the menu buttons below." },

        // --- Task list ---
        "tasks_today_header" => if ru { "📋 Задачи на сегодня:" } else { "📋 Tasks for today:" },
        "tasks_other_header" => if ru { "📋 Задачи на другие дни:" } else { "📋 Tasks for other days:" },
        "no_tasks_today" => if ru { "Нет задач на сегодня" } else { "No tasks for today" },
        "no_tasks_other" => if ru { "Нет задач на другие дни" } else { "No tasks for other days" },
        "btn_done" => if ru { "✔ Выполнено" } else { "✔ Done" },
        "btn_delete" => if ru { "❌ Удалить" } else { "❌ Delete" },

        // --- Reminder list ---
        "reminders_header" => if ru { "⏰ Напоминания:" } else { "⏰ Reminders:" },
        "reminders_today_header" => if ru { "📅 На сегодня:" } else { "📅 Today:" },
        "reminders_other_header" => if ru { "📅 На другие дни:" } else { "📅 Other days:" },
        "no_reminders_today" => if ru { "Нет напоминаний на сегодня" } else { "No reminders for today" },
        "no_reminders_other" => if ru { "Нет напоминаний на другие дни" } else { "No reminders for other days" },
        "daily_note" => if ru { "ежедневно" } else { "daily" },
        "paused_note" => if ru { "на паузе" } else { "paused" },
        "btn_stop" => if ru { "⏸ Остановить" } else { "⏸ Pause" },
        "btn_resume" => if ru { "▶ Возобновить" } else { "▶ Resume" },

        // --- Events, day, month ---
        "no_events" => if ru { "У вас нет событий." } else { "You have no events." },
        "today_note" => if ru { "🎉 Сегодня!" } else { "🎉 Today!" },
        "my_day_header" => if ru { "📅 Мой день" } else { "📅 My day" },
        "events_today_header" => if ru { "🎉 События на сегодня:" } else { "🎉 Events today:" },
        "no_events_today" => if ru { "Нет событий на сегодня" } else { "No events today" },
        "my_month_header" => if ru { "📆 Мой месяц" } else { "📆 My month" },
        "tasks_month_header" => if ru { "📋 Задачи на этот месяц:" } else { "📋 Tasks this month:" },
        "no_tasks_month" => if ru { "Нет задач на этот месяц" } else { "No tasks this month" },
        "events_month_header" => if ru { "🎉 События на этот месяц:" } else { "🎉 Events this month:" },
        "no_events_month" => if ru { "Нет событий на этот месяц" } else { "No events this month" },

        // --- Reading ---
        "reading_dir_missing" => if ru { "⚠ Папка с файлами не найдена." } else { "⚠ The reading folder was not found." },
        "reading_empty" => if ru { "⚠ Файлов пока нет." } else { "⚠ There are no files yet." },
        "reading_failed" => if ru { "⚠ Не удалось отправить файл." } else { "⚠ Could not send the file." },

        _ => "???",
    }
}
