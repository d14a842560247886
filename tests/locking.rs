// Tests for concurrent runs writing the same output files.
use chrono::NaiveDate;
use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;
use vault_timeline::config::Config;
use vault_timeline::context::TestContext;
use vault_timeline::controller::TimelineController;
use vault_timeline::storage::Storage;

#[test]
fn test_concurrent_runs_leave_one_complete_document() {
    let ctx = TestContext::new();
    for i in 0..20 {
        ctx.write_note(
            format!("Notes/Note{:02}.md", i),
            &format!("Reminder: 2025-06-{:02}\n", 10 + (i % 15)),
        );
    }
    let config = Arc::new(Config {
        vault: ctx.vault_dir(),
        ..Config::default()
    });
    let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    let expected = TimelineController::new(&config, today)
        .preview()
        .unwrap()
        .document;

    let thread_count = 8;
    let barrier = Arc::new(Barrier::new(thread_count));
    let mut handles = vec![];

    for i in 0..thread_count {
        let b = barrier.clone();
        let config = config.clone();
        handles.push(thread::spawn(move || {
            b.wait();
            let res = TimelineController::new(&config, today).run();
            assert!(res.is_ok(), "run failed in thread {}: {:?}", i, res.err());
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    let doc = fs::read_to_string(config.timeline_path()).unwrap();
    assert_eq!(doc, expected);
    let ics = fs::read_to_string(config.ical_path()).unwrap();
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 20);
}

#[test]
fn test_outputs_sharing_a_stem_do_not_share_a_temp_file() {
    let ctx = TestContext::new();
    let vault = ctx.vault_dir();
    let targets = [vault.join("Calendar.md"), vault.join("Calendar.ics")];
    let barrier = Arc::new(Barrier::new(targets.len()));

    let handles: Vec<_> = targets
        .iter()
        .cloned()
        .map(|path| {
            let b = barrier.clone();
            thread::spawn(move || {
                b.wait();
                for i in 0..300 {
                    let body = format!("{} #{}", path.display(), i);
                    Storage::write_locked(&path, body).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    for path in &targets {
        let body = fs::read_to_string(path).unwrap();
        assert_eq!(body, format!("{} #299", path.display()));
        assert!(!Storage::get_temp_path(path).exists());
    }
}

#[test]
fn test_concurrent_runs_with_calendar_next_to_timeline() {
    let ctx = TestContext::new();
    for i in 0..10 {
        ctx.write_note(
            format!("Notes/Note{:02}.md", i),
            &format!("Reminder: 2025-06-{:02}\nRepeat: 7\n", 1 + i),
        );
    }
    let vault = ctx.vault_dir();
    let config = Arc::new(Config {
        ical_file: Some(vault.join("Calendar.ics")),
        vault,
        ..Config::default()
    });
    let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    let expected = TimelineController::new(&config, today)
        .preview()
        .unwrap()
        .document;

    let thread_count = 6;
    let barrier = Arc::new(Barrier::new(thread_count));
    let handles: Vec<_> = (0..thread_count)
        .map(|i| {
            let b = barrier.clone();
            let config = config.clone();
            thread::spawn(move || {
                b.wait();
                for _ in 0..20 {
                    let res = TimelineController::new(&config, today).run();
                    assert!(res.is_ok(), "run failed in thread {}: {:?}", i, res.err());
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(fs::read_to_string(config.timeline_path()).unwrap(), expected);
    let ics = fs::read_to_string(config.ical_path()).unwrap();
    assert!(ics.starts_with("BEGIN:VCALENDAR"));
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 10);
}
