use std::time::Duration;

use agentdeck_core::{DemoEvent, Home, Scheduler, Sender, Settings, Tab};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{timeout, Instant};

async fn deliver_next(home: &mut Home, rx: &mut UnboundedReceiver<DemoEvent>) -> bool {
    let event = rx.recv().await.expect("scheduler channel closed");
    home.handle_event(event)
}

#[tokio::test(start_paused = true)]
async fn chat_round_trip_on_first_card() {
    let (scheduler, mut rx) = Scheduler::channel();
    let mut home = Home::new(Settings::default());

    let card = home.agent_mut(0).unwrap();
    card.input = "hi".to_string();
    assert!(card.submit(&scheduler));

    let messages = home.agents()[0].messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].sender, Sender::User);
    assert_eq!(messages[1].text, "hi");

    let start = Instant::now();
    assert!(deliver_next(&mut home, &mut rx).await);
    assert!(start.elapsed() >= Duration::from_millis(700));

    let messages = home.agents()[0].messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2].sender, Sender::Agent);
    assert_eq!(messages[2].text, "Agent #1 says: You said: \"hi\"");
}

#[tokio::test(start_paused = true)]
async fn search_round_trip() {
    let (scheduler, mut rx) = Scheduler::channel();
    let mut home = Home::new(Settings::default());
    home.select_tab(Tab::Google);

    let tab = home.search_mut().unwrap();
    tab.query = "cats".to_string();
    assert!(tab.submit(&scheduler));
    assert!(home.search().unwrap().is_loading());

    assert!(deliver_next(&mut home, &mut rx).await);
    let tab = home.search().unwrap();
    assert!(!tab.is_loading());
    assert_eq!(tab.results().len(), 1);
    assert_eq!(tab.results()[0].title, "Result for \"cats\"");
    assert!(tab.results()[0].link.contains("q=cats"));
}

#[tokio::test(start_paused = true)]
async fn switching_tabs_resets_cards_and_cancels_replies() {
    let (scheduler, mut rx) = Scheduler::channel();
    let mut home = Home::new(Settings::default());

    for i in 0..3 {
        let card = home.agent_mut(i).unwrap();
        card.input = format!("message {}", i);
        card.submit(&scheduler);
    }

    home.select_tab(Tab::Google);
    home.select_tab(Tab::Agents);

    for card in home.agents() {
        assert_eq!(card.messages().len(), 1);
        assert!(card.messages()[0].text.contains(&format!("#{}", card.id() + 1)));
    }

    // Replies scheduled by the old cards never arrive
    let late = timeout(Duration::from_secs(5), rx.recv()).await;
    assert!(late.is_err());
}

#[tokio::test(start_paused = true)]
async fn switching_away_from_search_clears_it() {
    let (scheduler, _rx) = Scheduler::channel();
    let mut home = Home::new(Settings::default());
    home.select_tab(Tab::Google);
    let tab = home.search_mut().unwrap();
    tab.query = "cats".to_string();
    tab.submit(&scheduler);

    home.select_tab(Tab::Agents);
    home.select_tab(Tab::Google);

    let tab = home.search().unwrap();
    assert!(tab.query.is_empty());
    assert!(!tab.is_loading());
    assert!(tab.results().is_empty());
}

#[tokio::test(start_paused = true)]
async fn quick_searches_show_only_the_later_query() {
    let (scheduler, mut rx) = Scheduler::channel();
    let mut home = Home::new(Settings::default());
    home.select_tab(Tab::Google);

    for query in ["dogs", "cats"] {
        let tab = home.search_mut().unwrap();
        tab.query = query.to_string();
        tab.submit(&scheduler);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    deliver_next(&mut home, &mut rx).await;
    deliver_next(&mut home, &mut rx).await;

    let results = home.search().unwrap().results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Result for \"cats\"");
}

#[tokio::test(start_paused = true)]
async fn custom_agent_count_and_delay() {
    let (scheduler, mut rx) = Scheduler::channel();
    let settings = Settings {
        agent_count: 25,
        reply_delay: Duration::from_millis(50),
        ..Settings::default()
    };
    let mut home = Home::new(settings);
    assert_eq!(home.agents().len(), 25);
    // Ids past the name list reuse its labels
    assert_eq!(home.agents()[20].name(), home.agents()[0].name());

    let card = home.agent_mut(24).unwrap();
    card.input = "late slot".to_string();
    card.submit(&scheduler);

    let start = Instant::now();
    assert!(deliver_next(&mut home, &mut rx).await);
    assert!(start.elapsed() < Duration::from_millis(700));
    assert!(home.agents()[24].messages()[2].text.starts_with("Agent #25 says"));
}
