//! Built-in reference data: topic catalog, the demo user, the starting
//! leaderboard, default feed contents, wallpapers and quotes.

use crate::domain::{
  Difficulty, Explanation, ExplanationStyle, LeaderboardEntry, Progress, QuizQuestion, Quote,
  Topic, UnderstandingEntry, User, Video, Wallpaper, WallpaperCategory, WatchedVideo,
};

pub const DEFAULT_AVATAR: &str =
  "https://api.dicebear.com/7.x/avataaars/svg?seed=Felix&backgroundColor=b6e3f4";
pub const DEFAULT_WALLPAPER_ID: &str = "default";
pub const DEMO_USER_ID: &str = "user-1";

const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 86_400_000;

/// A topic the notification feed refers to by numeric id.
pub struct FeedTopic {
  pub id: u32,
  pub title: &'static str,
  pub lang: &'static str,
}

pub const PENDING_FEED_TOPICS: &[FeedTopic] = &[
  FeedTopic { id: 6, title: "Advanced Iterators & Generators", lang: "Python" },
  FeedTopic { id: 7, title: "Red-Black Trees", lang: "Java" },
  FeedTopic { id: 8, title: "Memory Management", lang: "C" },
  FeedTopic { id: 9, title: "Async/Await Patterns", lang: "JavaScript" },
  FeedTopic { id: 10, title: "Graph Algorithms", lang: "Python" },
  FeedTopic { id: 11, title: "Dynamic Programming", lang: "C++" },
  FeedTopic { id: 12, title: "REST API Design", lang: "JSON" },
];

pub const COMPLETED_FEED_TOPICS: &[FeedTopic] = &[
  FeedTopic { id: 1, title: "Python Functions & Scope", lang: "Python" },
  FeedTopic { id: 2, title: "Java OOP Basics", lang: "Java" },
  FeedTopic { id: 3, title: "C Pointers Introduction", lang: "C" },
  FeedTopic { id: 4, title: "Data Structures Overview", lang: "Python" },
  FeedTopic { id: 5, title: "SQL Fundamentals", lang: "SQL" },
];

/// Reminder stagger: one hour apart, newest one hour ago.
pub fn reminder_offset_ms(i: usize) -> i64 {
  (i as i64 + 1) * HOUR_MS
}

/// Congrats stagger: one hour apart, newest eight hours ago.
pub fn congrats_offset_ms(i: usize) -> i64 {
  (i as i64 + 8) * HOUR_MS
}

pub fn default_understanding(now: i64) -> Vec<UnderstandingEntry> {
  let e = |topic_id, title: &str, value, label: &str, days_ago: i64| UnderstandingEntry {
    topic_id,
    topic_title: title.into(),
    value,
    label: label.into(),
    saved_at: now - days_ago * DAY_MS,
  };
  vec![
    e(1, "Python Functions & Scope", 82, "Mastered it!", 4),
    e(2, "Java OOP Basics", 58, "Getting there", 6),
    e(3, "C Pointers Introduction", 90, "Mastered it!", 9),
    e(4, "Data Structures Overview", 35, "Getting there", 12),
    e(5, "SQL Fundamentals", 72, "Understand it", 14),
  ]
}

pub fn seed_leaderboard() -> Vec<LeaderboardEntry> {
  let e = |rank, user_id: &str, name: &str, score, topics_completed, avatar: &str| LeaderboardEntry {
    rank,
    user_id: user_id.into(),
    name: name.into(),
    score,
    topics_completed,
    avatar: avatar.into(),
  };
  vec![
    e(1, "user-5", "Sophia Chen", 145, 5, "👩‍💻"),
    e(2, "user-4", "Rahul Patel", 120, 4, "👨‍💻"),
    e(3, DEMO_USER_ID, "Alex Johnson", 85, 1, "🧑‍💻"),
    e(4, "user-2", "Maria Garcia", 72, 2, "👩‍🎓"),
    e(5, "user-3", "James Wilson", 58, 1, "👨‍🎓"),
  ]
}

/// The account every successful login resolves to.
pub fn demo_user() -> User {
  let watched = |id: &str, title: &str, duration: &str, watched_at: &str, time_watched: &str| WatchedVideo {
    video: Video {
      id: id.into(),
      title: title.into(),
      language: "Python".into(),
      youtube_id: "dQw4w9WgXcQ".into(),
      thumbnail: "https://img.youtube.com/vi/dQw4w9WgXcQ/mqdefault.jpg".into(),
      duration: duration.into(),
    },
    watched_at: watched_at.into(),
    time_watched: time_watched.into(),
  };
  User {
    id: DEMO_USER_ID.into(),
    name: "Alex Johnson".into(),
    email: "alex@edutwin.com".into(),
    avatar: "🧑‍💻".into(),
    rank: 3,
    progress: Progress {
      completed_topics: vec!["topic-1".into()],
      pending_topics: vec!["topic-3".into(), "topic-4".into(), "topic-5".into()],
      in_progress_topics: vec!["topic-2".into()],
      videos_watched: vec![
        watched("vid-1", "Python Loops Explained", "12:30", "2026-02-20", "10:15"),
        watched("vid-4", "Functions Deep Dive", "18:45", "2026-02-19", "15:20"),
      ],
      total_score: 85,
      preferred_style: ExplanationStyle::Visual,
      confusion_count: 0,
    },
  }
}

type QuizSeed<'a> = (&'a str, [&'a str; 4], usize);

#[allow(clippy::too_many_arguments)]
fn topic(
  id: &str,
  language: &str,
  name: &str,
  difficulty: Difficulty,
  overview: &str,
  explanations: [&str; 4],
  quiz: &[QuizSeed<'_>],
  videos: &[(&str, &str, &str, &str)],
) -> Topic {
  let styles = [
    (ExplanationStyle::Visual, "Visual Explanation"),
    (ExplanationStyle::Simplified, "Simplified Explanation"),
    (ExplanationStyle::Logical, "Logical Explanation"),
    (ExplanationStyle::Analogy, "Analogy Explanation"),
  ];
  Topic {
    id: id.into(),
    language: language.into(),
    topic_name: name.into(),
    difficulty,
    overview: overview.into(),
    explanations: styles
      .iter()
      .zip(explanations)
      .map(|((style, title), content)| Explanation {
        style: *style,
        title: (*title).into(),
        content: content.into(),
      })
      .collect(),
    quiz: quiz
      .iter()
      .enumerate()
      .map(|(i, (q, opts, a))| QuizQuestion {
        id: format!("q-{}", i + 1),
        question: (*q).into(),
        options: opts.iter().map(|o| (*o).to_string()).collect(),
        correct_answer: *a,
      })
      .collect(),
    recommended_videos: videos
      .iter()
      .map(|(vid, title, yt, duration)| Video {
        id: (*vid).into(),
        title: (*title).into(),
        language: language.into(),
        youtube_id: (*yt).into(),
        thumbnail: format!("https://img.youtube.com/vi/{}/mqdefault.jpg", yt),
        duration: (*duration).into(),
      })
      .collect(),
  }
}

/// Built-in topic catalog.
pub fn seed_topics() -> Vec<Topic> {
  vec![
    topic(
      "topic-1", "Python", "Python Loops", Difficulty::Beginner,
      "Loops execute a block of code repeatedly. Python provides for loops and while loops for automating repetitive tasks and processing collections.",
      [
        "A for loop is a conveyor belt: each item gets the same processing. A while loop is a gate that keeps checking until a condition changes.",
        "A loop means \"do this again and again\". for i in range(5): print(i) prints 0 through 4.",
        "A for loop binds each element of an iterable to the loop variable; a while loop re-evaluates a boolean before each iteration. Both are O(n) in the iterations performed.",
        "A for loop is reading every page of a book; a while loop is reading until you find a specific word.",
      ],
      &[
        ("What keyword starts a for loop in Python?", ["for", "loop", "repeat", "iterate"], 0),
        ("What does range(5) return?", ["1 to 5", "0 to 5", "0 to 4", "1 to 4"], 2),
        ("Which loop runs while a condition is true?", ["for", "while", "do-while", "foreach"], 1),
        ("What does \"break\" do in a loop?", ["Pauses loop", "Exits loop", "Restarts loop", "Skips iteration"], 1),
        ("What does \"continue\" do?", ["Exits loop", "Restarts loop", "Skips current iteration", "Pauses loop"], 2),
      ],
      &[
        ("vid-1", "Python Loops Explained", "6iF8Xb7Z3wQ", "12:30"),
        ("vid-2", "For Loop vs While Loop", "6iF8Xb7Z3wQ", "8:45"),
        ("vid-3", "Loop Tricks & Tips", "6iF8Xb7Z3wQ", "15:20"),
      ],
    ),
    topic(
      "topic-2", "Python", "Python Functions", Difficulty::Beginner,
      "Functions are reusable blocks of code defined with def. They accept parameters, return values and can be passed to other functions.",
      [
        "A function is a machine on a workbench: inputs go in one side, a result comes out the other.",
        "A function is a named recipe. Call it and it runs; return hands the result back.",
        "A function maps arguments to a return value and introduces its own local scope; names resolve local, enclosing, global, then built-in.",
        "A function is a vending machine: press the button with coins and get a snack, without knowing the mechanism inside.",
      ],
      &[
        ("What keyword defines a function in Python?", ["func", "def", "function", "define"], 1),
        ("What does return do in a function?", ["Prints value", "Sends value back", "Stops program", "Loops"], 1),
        ("What is *args used for?", ["Keyword arguments", "Variable positional arguments", "Default values", "Return types"], 1),
        ("What is a lambda function?", ["Named function", "Anonymous one-line function", "Class method", "A loop"], 1),
        ("What happens without return statement?", ["Error", "Returns None", "Returns 0", "Loops"], 1),
      ],
      &[
        ("vid-4", "Functions Deep Dive", "9Os0o3wzS_I", "18:45"),
        ("vid-5", "Lambda & Higher Order", "9Os0o3wzS_I", "14:20"),
        ("vid-6", "Decorators Explained", "9Os0o3wzS_I", "11:00"),
      ],
    ),
    topic(
      "topic-3", "Java", "Java OOPS", Difficulty::Intermediate,
      "Object-Oriented Programming in Java rests on encapsulation, inheritance, polymorphism and abstraction, with classes and objects as building blocks.",
      [
        "A class is a blueprint and objects are the houses built from it; inheritance is a blueprint extending another.",
        "A class describes a thing, an object is one real thing, and methods are what it can do.",
        "Encapsulation restricts state access, inheritance forms an is-a hierarchy, polymorphism dispatches on runtime type, abstraction exposes contracts.",
        "A car model is the class, your car is the object, and every car having a steering wheel is the interface.",
      ],
      &[
        ("What is a class?", ["An object", "A blueprint for objects", "A function", "A variable"], 1),
        ("What keyword creates an object?", ["create", "new", "make", "object"], 1),
        ("What keyword enables inheritance?", ["inherit", "extends", "super", "implements"], 1),
        ("What is polymorphism?", ["Same name different behavior", "Multiple classes", "Data hiding", "Code reuse"], 0),
        ("What access modifier is most restrictive?", ["public", "protected", "default", "private"], 3),
      ],
      &[
        ("vid-7", "Java OOP Crash Course", "pTB0EiLXUC8", "22:15"),
        ("vid-8", "Inheritance & Polymorphism", "pTB0EiLXUC8", "16:30"),
        ("vid-9", "Design Patterns Intro", "pTB0EiLXUC8", "25:00"),
      ],
    ),
    topic(
      "topic-4", "C", "C Pointers", Difficulty::Advanced,
      "Pointers store memory addresses of other variables and enable dynamic allocation, efficient array handling and linked data structures.",
      [
        "Memory is a street of numbered houses; a pointer is a note holding one house number.",
        "A pointer holds where a value lives. & gets the address, * follows it.",
        "A pointer of type T* holds an address; dereferencing reads sizeof(T) bytes there, and arithmetic advances in units of sizeof(T).",
        "A pointer is a library catalog card: it does not hold the book, it tells you which shelf it is on.",
      ],
      &[
        ("What does a pointer store?", ["A value", "A memory address", "A function", "A string"], 1),
        ("What operator gets address of variable?", ["*", "&", "#", "@"], 1),
        ("What operator dereferences a pointer?", ["&", "->", "*", "::"], 2),
        ("What is a dangling pointer?", ["Valid pointer", "Points to freed memory", "NULL pointer", "Array pointer"], 1),
        ("What must you do after malloc?", ["Print", "free() the memory", "Return", "Loop"], 1),
      ],
      &[
        ("vid-10", "C Pointers Made Easy", "zuegQmMdy8M", "20:00"),
        ("vid-11", "Dynamic Memory in C", "zuegQmMdy8M", "17:30"),
        ("vid-12", "Pointer Pitfalls", "zuegQmMdy8M", "14:15"),
      ],
    ),
    topic(
      "topic-5", "JSON", "JSON Basics", Difficulty::Beginner,
      "JSON is a lightweight data interchange format, easy for humans to read and machines to parse, and the common format for APIs and configuration.",
      [
        "JSON is a labelled filing cabinet: each drawer has a name and holds a value, or another cabinet.",
        "JSON is key-value pairs in curly braces, lists in square brackets, and text in double quotes.",
        "JSON values are strings, numbers, booleans, null, arrays or objects; objects map string keys to values and nest arbitrarily.",
        "JSON is a shipping label format every courier agrees on, so any program can read the package.",
      ],
      &[
        ("What does JSON stand for?", ["Java Standard Object Notation", "JavaScript Object Notation", "JSON Script Object", "Java Source Object"], 1),
        ("What wraps a JSON object?", ["[] brackets", "{} curly braces", "() parentheses", "<> angle brackets"], 1),
        ("Which is NOT a valid JSON value?", ["string", "undefined", "null", "number"], 1),
        ("Can JSON have comments?", ["Yes", "No", "Only single-line", "Only multi-line"], 1),
        ("What is MIME type for JSON?", ["text/json", "application/json", "data/json", "json/text"], 1),
      ],
      &[
        ("vid-13", "JSON Crash Course", "iiADhChRriM", "10:30"),
        ("vid-14", "JSON in Real Projects", "iiADhChRriM", "13:00"),
        ("vid-15", "APIs and JSON", "iiADhChRriM", "16:45"),
      ],
    ),
  ]
}

pub const WALLPAPERS: &[Wallpaper] = &[
  Wallpaper { id: "default", name: "Peach Blossom", category: WallpaperCategory::Pastel, gradient: "linear-gradient(135deg,#fdf6f0,#fff5f5)" },
  Wallpaper { id: "ocean-breeze", name: "Ocean Breeze", category: WallpaperCategory::Pastel, gradient: "linear-gradient(135deg,#eff6ff,#ecfeff)" },
  Wallpaper { id: "lavender-dream", name: "Lavender Dream", category: WallpaperCategory::Pastel, gradient: "linear-gradient(135deg,#faf5ff,#fdf2f8)" },
  Wallpaper { id: "mint-sorbet", name: "Mint Sorbet", category: WallpaperCategory::Pastel, gradient: "linear-gradient(135deg,#ecfdf5,#f0fdfa)" },
  Wallpaper { id: "midnight", name: "Midnight", category: WallpaperCategory::Dark, gradient: "linear-gradient(135deg,#0f172a,#1e1b4b)" },
  Wallpaper { id: "carbon", name: "Carbon", category: WallpaperCategory::Dark, gradient: "linear-gradient(135deg,#111827,#374151)" },
  Wallpaper { id: "neon-arcade", name: "Neon Arcade", category: WallpaperCategory::Gaming, gradient: "linear-gradient(135deg,#2e1065,#be185d)" },
  Wallpaper { id: "pixel-forest", name: "Pixel Forest", category: WallpaperCategory::Gaming, gradient: "linear-gradient(135deg,#14532d,#365314)" },
  Wallpaper { id: "film-grain", name: "Film Grain", category: WallpaperCategory::Aesthetic, gradient: "linear-gradient(135deg,#fafaf9,#e7e5e4)" },
];

/// Resolve a wallpaper by id, falling back to the first catalog entry.
pub fn wallpaper_by_id(id: &str) -> &'static Wallpaper {
  WALLPAPERS.iter().find(|w| w.id == id).unwrap_or(&WALLPAPERS[0])
}

pub const MOTIVATIONAL_QUOTES: &[Quote] = &[
  Quote { quote: "The expert in anything was once a beginner. Keep coding, keep growing!", author: "Helen Hayes" },
  Quote { quote: "Every line of code you write is a step closer to mastery. You're building something amazing!", author: "EduTwin" },
  Quote { quote: "Don't watch the clock; do what it does. Keep going!", author: "Sam Levenson" },
  Quote { quote: "The only way to learn a new programming language is by writing programs in it.", author: "Dennis Ritchie" },
  Quote { quote: "Success is the sum of small efforts, repeated day in and day out.", author: "Robert Collier" },
];

pub const DAILY_CHALLENGES: &[&str] = &[
  "🎯 Complete one pending topic today!",
  "⚡ Take a quiz and beat your high score!",
  "📝 Write notes for 3 topics you studied!",
  "🔥 Maintain your learning streak!",
  "🌟 Teach someone what you learned today!",
  "💡 Review your highlighted notes!",
  "✍️ Summarise today's learning in 3 bullets!",
];
