use std::time::Instant;

use acadify_client::core::client::Acadify;
use acadify_client::core::quiz_engine::{GENERATING_SCREEN_DELAY, ProctorScreen, QuizAttempt};
use acadify_client::model::quiz::Level;
use acadify_client::utils::input::{input, input_password};

const DEFAULT_BASE_URL: &str = "https://api.acadify.example.com/api/v1";

/// Terminal stand-in for the browser's fullscreen surface: the learner
/// opts into focus mode before the attempt starts.
struct TerminalScreen {
    fullscreen: bool,
}

impl ProctorScreen for TerminalScreen {
    fn enter_fullscreen(&mut self) -> bool {
        let answer = input("The quiz runs in focus mode with a live timer. Enter it now? [y/N] ");
        self.fullscreen = answer.eq_ignore_ascii_case("y");
        self.fullscreen
    }

    fn exit_fullscreen(&mut self) {
        self.fullscreen = false;
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    let base_url =
        std::env::var("ACADIFY_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    let email = input("Email: ");
    let client = Acadify::new(&base_url, &email)?;

    match client.load_user().await? {
        Some(user) => println!("Welcome back, {}!", user.name),
        None => {
            let password = input_password("Password: ");
            let Ok(user) = client.login(&email, &password).await else {
                eprintln!("Login failed.");
                return Ok(());
            };
            println!("Logged in as {}.", user.name);
        }
    }

    loop {
        println!();
        println!(
            "[1] Published courses  [2] Search  [3] My learning  [4] Course detail  [5] Take a quiz  [q] Logout"
        );
        match input("> ").as_str() {
            "1" => show_published_courses(&client).await,
            "2" => search_courses(&client).await,
            "3" => show_my_learning(&client).await,
            "4" => show_course_detail(&client).await,
            "5" => take_quiz(&client).await,
            "q" => {
                if let Err(err) = client.logout().await {
                    eprintln!("Logout failed ({}); local session cleared.", err.message);
                }
                break;
            }
            _ => println!("Unknown choice."),
        }
    }

    Ok(())
}

async fn show_published_courses(client: &Acadify) {
    match client.published_courses().await {
        Ok(courses) if courses.is_empty() => println!("No published courses yet."),
        Ok(courses) => {
            for course in courses {
                println!(
                    "{}  {}  ({} students)",
                    course.id,
                    course.course_title,
                    course.enrolled_students.len()
                );
            }
        }
        Err(err) => eprintln!("Could not load courses: {}", err.message),
    }
}

async fn search_courses(client: &Acadify) {
    let query = input("Search: ").to_lowercase();
    match client.published_courses().await {
        Ok(courses) => {
            let hits: Vec<_> = courses
                .iter()
                .filter(|course| {
                    course.course_title.to_lowercase().contains(&query)
                        || course
                            .category
                            .as_deref()
                            .is_some_and(|c| c.to_lowercase().contains(&query))
                })
                .collect();
            if hits.is_empty() {
                println!("No courses match \"{}\".", query);
            }
            for course in hits {
                println!("{}  {}", course.id, course.course_title);
            }
        }
        Err(err) => eprintln!("Search failed: {}", err.message),
    }
}

async fn show_my_learning(client: &Acadify) {
    match client.my_learning().await {
        Ok(courses) if courses.is_empty() => println!("You have not enrolled in any course yet."),
        Ok(courses) => {
            for course in courses {
                println!("{}  {}", course.id, course.course_title);
            }
        }
        Err(err) => eprintln!("Could not load your courses: {}", err.message),
    }
}

async fn show_course_detail(client: &Acadify) {
    let course_id = input("Course id: ");
    let course = match client.course_detail(&course_id).await {
        Ok(course) => course,
        Err(err) => {
            eprintln!("Could not load course: {}", err.message);
            return;
        }
    };

    println!("{}", course.course_title);
    if let Some(sub_title) = &course.sub_title {
        println!("{}", sub_title);
    }
    println!(
        "Price: {}  Purchased: {}",
        course
            .course_price
            .map(|p| format!("₹{}", p))
            .unwrap_or_else(|| "free".to_string()),
        if course.purchased { "yes" } else { "no" }
    );
    for lecture in &course.lectures {
        let quiz = match &lecture.quiz {
            Some(quiz) => format!("  [quiz: {} questions]", quiz.questions.len()),
            None => String::new(),
        };
        println!("  {}  {}{}", lecture.id, lecture.lecture_title, quiz);
    }

    if !course.purchased && input("Buy this course? [y/N] ").eq_ignore_ascii_case("y") {
        match client.create_course_order(&course.id).await {
            Ok(order) => {
                println!("Order {} created (amount {}).", order.order_id, order.amount);
                println!("Complete the payment in your browser, then reopen the course.");
                // post-payment state is ambiguous here, so drop the
                // cached views instead of reconciling them
                if let Ok(reloaded) = client.reload_after_purchase(&course.id).await {
                    println!("Purchased: {}", if reloaded.purchased { "yes" } else { "no" });
                }
            }
            Err(err) => eprintln!("Order failed: {}", err.message),
        }
    }
}

async fn take_quiz(client: &Acadify) {
    let course_id = input("Course id: ");
    let lecture_id = input("Lecture id: ");

    let lecture = match client.lecture(&course_id, &lecture_id).await {
        Ok(lecture) => lecture,
        Err(err) => {
            eprintln!("Could not load lecture: {}", err.message);
            return;
        }
    };
    let Some(quiz) = &lecture.quiz else {
        println!("No quiz found for this lecture.");
        return;
    };

    for level in Level::ALL {
        println!("{:>6}: {} questions", level.as_str(), quiz.count_at(level));
    }
    let Ok(level) = input("Difficulty: ").parse::<Level>() else {
        println!("Pick easy, medium or hard.");
        return;
    };

    println!("Preparing your question set...");
    tokio::time::sleep(GENERATING_SCREEN_DELAY).await;

    let mut attempt = match QuizAttempt::new(quiz, level) {
        Ok(attempt) => attempt,
        Err(err) => {
            println!("{}", err.message);
            return;
        }
    };
    let mut screen = TerminalScreen { fullscreen: false };
    if let Err(err) = attempt.start(&mut screen) {
        println!("{}", err.message);
        return;
    }

    let mut last_tick = Instant::now();
    let outcome = loop {
        let question = attempt.current_question();
        println!();
        println!(
            "[{}] Q{}/{}  {}",
            attempt.clock(),
            attempt.current_index() + 1,
            attempt.len(),
            question.question
        );
        for (i, option) in question.options.iter().enumerate() {
            let marker = if attempt.selected_answer() == Some(option.as_str()) {
                "*"
            } else {
                " "
            };
            println!(" {}{}) {}", marker, (b'a' + i as u8) as char, option);
        }

        let command = input("answer letter, (n)ext, (p)rev, (s)ubmit: ");

        // the clock keeps running while the learner thinks
        let elapsed = last_tick.elapsed().as_secs();
        last_tick = Instant::now();
        let mut forced = None;
        for _ in 0..elapsed.max(1) {
            if let Some(outcome) = attempt.tick(&mut screen) {
                forced = Some(outcome);
                break;
            }
        }
        if let Some(outcome) = forced {
            println!("Time over, submitting your answers.");
            break outcome;
        }

        match command.as_str() {
            "n" => attempt.next(),
            "p" => attempt.previous(),
            "s" => match attempt.submit(&mut screen) {
                Ok(outcome) => break outcome,
                Err(err) => println!("{}", err.message),
            },
            letter => {
                let index = letter
                    .bytes()
                    .next()
                    .filter(|b| b.is_ascii_lowercase())
                    .map(|b| (b - b'a') as usize);
                match index.and_then(|i| attempt.current_question().options.get(i).cloned()) {
                    Some(option) => attempt.select_answer(&option),
                    None => println!("Unknown command."),
                }
            }
        }
    };

    println!();
    println!(
        "Score: {}/{} ({}%)  {}",
        outcome.score,
        outcome.total,
        outcome.percentage(),
        outcome.band().label()
    );
    println!("\"{}\"", outcome.band().encouragement(&mut rand::rng()));

    if input("Review answers? [y/N] ").eq_ignore_ascii_case("y") {
        for entry in outcome.review() {
            let status = if entry.is_correct { "✓" } else { "✗" };
            println!("{} Q{}: {}", status, entry.index + 1, entry.question.question);
            println!(
                "    your answer: {}   correct: {}",
                entry.selected.unwrap_or("skipped"),
                entry.question.correct_answer
            );
        }
    }
}
