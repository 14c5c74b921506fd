//! Motivational quote shown under the dashboard greeting.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

pub const QUOTES: &[Quote] = &[
    Quote {
        text: "The only way to do great work is to love what you do.",
        author: "Steve Jobs",
    },
    Quote {
        text: "Success is not final, failure is not fatal: It is the courage to continue that counts.",
        author: "Winston Churchill",
    },
    Quote {
        text: "Believe you can and you're halfway there.",
        author: "Theodore Roosevelt",
    },
    Quote {
        text: "It does not matter how slowly you go as long as you do not stop.",
        author: "Confucius",
    },
    Quote {
        text: "Your time is limited, don't waste it living someone else's life.",
        author: "Steve Jobs",
    },
    Quote {
        text: "The future belongs to those who believe in the beauty of their dreams.",
        author: "Eleanor Roosevelt",
    },
    Quote {
        text: "The best way to predict the future is to create it.",
        author: "Peter Drucker",
    },
    Quote {
        text: "Don't watch the clock; do what it does. Keep going.",
        author: "Sam Levenson",
    },
    Quote {
        text: "It always seems impossible until it's done.",
        author: "Nelson Mandela",
    },
    Quote {
        text: "Whatever you are, be a good one.",
        author: "Abraham Lincoln",
    },
    Quote {
        text: "You are never too old to set another goal or to dream a new dream.",
        author: "C.S. Lewis",
    },
    Quote {
        text: "It's not whether you get knocked down, it's whether you get up.",
        author: "Vince Lombardi",
    },
    Quote {
        text: "The only limit to our realization of tomorrow is our doubts of today.",
        author: "Franklin D. Roosevelt",
    },
    Quote {
        text: "You miss 100% of the shots you don't take.",
        author: "Wayne Gretzky",
    },
    Quote {
        text: "The way to get started is to quit talking and begin doing.",
        author: "Walt Disney",
    },
    Quote {
        text: "If you want to lift yourself up, lift up someone else.",
        author: "Booker T. Washington",
    },
    Quote {
        text: "Life is what happens when you're busy making other plans.",
        author: "John Lennon",
    },
    Quote {
        text: "Whether you think you can or you think you can't, you're right.",
        author: "Henry Ford",
    },
    Quote {
        text: "I have not failed. I've just found 10,000 ways that won't work.",
        author: "Thomas Edison",
    },
    Quote {
        text: "The only person you are destined to become is the person you decide to be.",
        author: "Ralph Waldo Emerson",
    },
];

/// The quote for a given day. Every call on the same day returns the same
/// quote and consecutive days walk through the whole list.
pub fn quote_for_day(date: NaiveDate) -> Quote {
    let index = date.num_days_from_ce().rem_euclid(QUOTES.len() as i32) as usize;
    QUOTES[index]
}
