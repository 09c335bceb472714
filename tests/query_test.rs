//! Integration tests for queries and threads

mod common;

use common::*;
use notmuch::{Config, Database, Exclude, Mode, Sort, Thread};

fn first_thread<'q>(query: &'q notmuch::Query<'_>) -> Thread<'q> {
    query
        .threads()
        .unwrap()
        .next()
        .expect("query matched no thread")
}

mod query_tests {
    use super::*;

    #[test]
    fn test_query_string() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);
        let query = db.create_query("subject:\"Introducing myself\"").unwrap();
        assert_eq!(query.query_string(), "subject:\"Introducing myself\"");
    }

    #[test]
    fn test_sort() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);
        let mut query = db.create_query("*").unwrap();
        assert_eq!(query.sort(), Sort::NewestFirst);
        query.set_sort(Sort::OldestFirst);
        assert_eq!(query.sort(), Sort::OldestFirst);
    }

    #[test]
    fn test_counts() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);
        let query = db.create_query("*").unwrap();
        assert_eq!(query.count_messages().unwrap(), FIXTURE_COUNT);
        assert_eq!(query.count_threads().unwrap(), 3);
        assert_eq!(query.threads().unwrap().count(), 3);
        assert_eq!(query.messages().unwrap().count(), FIXTURE_COUNT as usize);
    }

    #[test]
    fn test_no_match() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);
        let query = db.create_query("from:nobody-at-all").unwrap();

        let mut threads = query.threads().unwrap();
        assert!(threads.next().is_none());
        assert!(threads.next().is_none());

        let mut messages = query.messages().unwrap();
        assert!(messages.next().is_none());
        assert!(messages.next().is_none());
        assert_eq!(query.count_messages().unwrap(), 0);
    }

    #[test]
    fn test_oldest_first_ordering() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);
        let mut query = db.create_query("*").unwrap();
        query.set_sort(Sort::OldestFirst);

        let dates: Vec<_> = query.messages().unwrap().map(|m| m.date()).collect();
        assert_eq!(dates.len(), FIXTURE_COUNT as usize);
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_iteration_is_deterministic() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);

        let run = || -> Vec<String> {
            let query = db.create_query("*").unwrap();
            let ids = query.threads().unwrap().map(|t| t.id()).collect();
            ids
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_messages_outlive_cursor() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);
        let query = db.create_query("subject:\"Introducing myself\"").unwrap();

        let messages: Vec<_> = query.messages().unwrap().collect();
        assert_eq!(messages.len(), 3);
        let mut ids: Vec<_> = messages.iter().map(|m| m.id()).collect();
        ids.sort();
        assert!(ids.contains(&INTRO_ID.to_string()));
    }

    #[test]
    fn test_threads_outlive_cursor() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);
        let query = db.create_query("*").unwrap();

        let threads: Vec<_> = query.threads().unwrap().collect();
        let total: u32 = threads.iter().map(|t| t.total_messages()).sum();
        assert_eq!(total, FIXTURE_COUNT);
    }

    #[test]
    fn test_tag_exclusion() {
        let root = MailRoot::new();
        {
            let db = root.open(Mode::ReadWrite);
            let message = db.find_message(INTRO_ID).unwrap().unwrap();
            message.add_tag("spam").unwrap();
            drop(message);
            db.close().unwrap();
        }

        let db = root.open(Mode::ReadOnly);
        let mut query = db.create_query("*").unwrap();
        query.add_tag_exclude("spam").unwrap();
        assert_eq!(query.count_messages().unwrap(), FIXTURE_COUNT - 1);

        let mut query = db.create_query("*").unwrap();
        query.add_tag_exclude("spam").unwrap();
        query.set_omit_excluded(Exclude::Include);
        assert_eq!(query.count_messages().unwrap(), FIXTURE_COUNT);

        // Naming the tag in the query overrides the exclusion
        let mut query = db.create_query("tag:spam").unwrap();
        query.add_tag_exclude("spam").unwrap();
        assert_eq!(query.count_messages().unwrap(), 1);
    }

    #[test]
    fn test_config_create_query() {
        let root = MailRoot::new();
        {
            let db = root.open(Mode::ReadWrite);
            let message = db.find_message(JANAK_ID).unwrap().unwrap();
            message.add_tag("deleted").unwrap();
            drop(message);
            db.close().unwrap();
        }

        let mut config = Config::new(root.path()).with_exclude_tag("deleted");
        config.sort = Sort::OldestFirst;

        let db = config.open_database().unwrap();
        assert_eq!(db.mode(), Mode::ReadOnly);

        let query = config.create_query(&db, "*").unwrap();
        assert_eq!(query.sort(), Sort::OldestFirst);
        assert_eq!(query.count_messages().unwrap(), FIXTURE_COUNT - 1);
    }

    #[test]
    fn test_config_open_missing_database() {
        let config = Config::new("/not-found/mail");
        assert!(matches!(
            config.open_database(),
            Err(notmuch::Error::NotFound(_))
        ));
    }
}

mod thread_tests {
    use super::*;

    #[test]
    fn test_thread_id() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);
        let query = db.create_query("Essai accentué").unwrap();
        let thread = first_thread(&query);

        let id = thread.id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_count() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);
        let query = db.create_query("subject:\"Introducing myself\" Hello").unwrap();
        let thread = first_thread(&query);
        assert_eq!(thread.total_messages(), 3);
        assert_eq!(thread.matched_messages(), 1);
    }

    #[test]
    fn test_subject_utf8() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);
        let query = db.create_query("Essai accentué").unwrap();
        let mut threads = query.threads().unwrap();
        let thread = threads.next().unwrap();
        assert_eq!(thread.subject(), "Essai accentué");
        assert!(threads.next().is_none());
    }

    #[test]
    fn test_toplevel_messages() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);
        let query = db.create_query("subject:\"Introducing myself\"").unwrap();
        let thread = first_thread(&query);

        let toplevel: Vec<_> = thread.toplevel_messages().collect();
        assert_eq!(toplevel.len(), 1);
        assert_eq!(toplevel[0].id(), INTRO_ID);
        assert_eq!(toplevel[0].thread_id(), thread.id());
    }

    #[test]
    fn test_messages() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);
        let query = db.create_query("subject:\"Introducing myself\"").unwrap();
        let thread = first_thread(&query);

        let mut count = 0;
        for message in thread.messages() {
            assert_eq!(message.thread_id(), thread.id());
            count += 1;
        }
        assert_eq!(count, 3);
        assert!(thread.toplevel_messages().count() <= thread.messages().count());
    }

    #[test]
    fn test_replies() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);
        let query = db.create_query("subject:\"Introducing myself\"").unwrap();
        let thread = first_thread(&query);

        let first = thread.toplevel_messages().next().unwrap();
        let replies: Vec<_> = first.replies().collect();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].id(), "yunbpj0etua.fsf@aiko.keithp.com");

        let nested: Vec<_> = replies[0].replies().collect();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].id(), "87ws1ry0hc.fsf@yoom.home.cworth.org");
        assert_eq!(nested[0].replies().count(), 0);
    }

    #[test]
    fn test_authors_all_matched() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);
        let query = db.create_query("subject:\"Introducing myself\"").unwrap();
        let authors = first_thread(&query).authors();
        assert_eq!(
            authors.matched,
            vec!["Adrian Perez de Castro", "Keith Packard", "Carl Worth"]
        );
        assert!(authors.unmatched.is_empty());
    }

    #[test]
    fn test_authors_partially_matched() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);
        let query = db.create_query("subject:\"Introducing myself\" Hello").unwrap();
        let authors = first_thread(&query).authors();
        assert_eq!(authors.matched, vec!["Adrian Perez de Castro"]);
        assert_eq!(authors.unmatched, vec!["Keith Packard", "Carl Worth"]);
    }

    #[test]
    fn test_authors_from_jan() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);
        let query = db.create_query("from:Jan").unwrap();

        let mut seen = 0;
        for thread in query.threads().unwrap() {
            let authors = thread.authors();
            assert_eq!(authors.matched, vec!["Jan Janak"]);
            if thread.total_messages() == 2 {
                assert_eq!(authors.unmatched, vec!["Carl Worth"]);
            } else {
                assert!(authors.unmatched.is_empty());
            }
            seen += 1;
        }
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_dates() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);
        let query = db.create_query("subject:\"Introducing myself\"").unwrap();
        let thread = first_thread(&query);
        assert_eq!(thread.oldest_date().timestamp(), INTRO_OLDEST);
        assert_eq!(thread.newest_date().timestamp(), INTRO_NEWEST);
        assert!(thread.oldest_date() <= thread.newest_date());
    }

    #[test]
    fn test_thread_tags() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);
        let query = db.create_query("subject:\"Introducing myself\"").unwrap();
        let thread = first_thread(&query);
        assert_eq!(thread.tags().into_vec(), vec!["inbox", "unread"]);
    }

    #[test]
    fn test_matched_never_exceeds_total() {
        let root = MailRoot::new();
        let db = root.open(Mode::ReadOnly);
        for qs in ["*", "from:Jan", "Hello", "subject:Introducing"] {
            let query = db.create_query(qs).unwrap();
            for thread in query.threads().unwrap() {
                assert!(thread.matched_messages() <= thread.total_messages());
                assert!(thread.matched_messages() >= 1);
            }
        }
    }
}

#[test]
fn test_query_after_reopen() {
    let root = MailRoot::new();
    let db = Database::open(root.path(), Mode::ReadOnly).unwrap();
    assert_eq!(db.create_query("*").unwrap().count_threads().unwrap(), 3);
    db.close().unwrap();

    let db = Database::open(root.path(), Mode::ReadOnly).unwrap();
    assert_eq!(db.create_query("*").unwrap().count_threads().unwrap(), 3);
}
