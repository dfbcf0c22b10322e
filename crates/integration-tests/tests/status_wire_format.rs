//! Wire-format contract for the status values the admin JSON API and the
//! status forms exchange: JSON bodies, form posts, and database TEXT all
//! carry the same snake_case codes.

#![allow(clippy::unwrap_used)]

use paws_core::{OrderStatus, QuickOrderStatus, ReviewStatus};
use serde_json::json;

#[test]
fn test_order_status_json_uses_the_wire_names() {
    for status in OrderStatus::ALL {
        assert_eq!(serde_json::to_value(status).unwrap(), json!(status.as_str()));
    }
}

#[test]
fn test_order_status_json_rejects_display_labels() {
    assert!(serde_json::from_value::<OrderStatus>(json!("Processing")).is_err());
    assert!(serde_json::from_value::<OrderStatus>(json!("PROCESSING")).is_err());
    assert_eq!(
        serde_json::from_value::<OrderStatus>(json!("processing")).unwrap(),
        OrderStatus::Processing
    );
}

#[test]
fn test_quick_order_status_json_round_trips() {
    for status in QuickOrderStatus::ALL {
        let value = serde_json::to_value(status).unwrap();
        assert_eq!(value, json!(status.as_str()));
        assert_eq!(
            serde_json::from_value::<QuickOrderStatus>(value).unwrap(),
            *status
        );
    }
}

#[test]
fn test_form_posts_and_json_agree() {
    // The HTML status forms post `as_str` codes and the JSON API posts
    // serde ones; both must parse to the same variant.
    for status in OrderStatus::ALL {
        let from_form: OrderStatus = status.as_str().parse().unwrap();
        let from_json: OrderStatus =
            serde_json::from_value(json!(status.as_str())).unwrap();
        assert_eq!(from_form, from_json);
    }
}

#[test]
fn test_review_moderation_codes() {
    assert_eq!(ReviewStatus::Pending.as_str(), "pending");
    assert_eq!(ReviewStatus::Approved.as_str(), "approved");
    assert_eq!(ReviewStatus::Rejected.as_str(), "rejected");
    assert_eq!("approved".parse::<ReviewStatus>().unwrap(), ReviewStatus::Approved);
}
