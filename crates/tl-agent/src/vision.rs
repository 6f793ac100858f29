//! Mock bill-image analysis
//!
//! Stands in for a real vision model: recognizes a couple of common billers
//! from the image description and fabricates their bill details.

use tracing::info;

use tl_types::BillDetails;

/// Recognize a known biller from a free-text description
pub fn detect_bill(description: &str) -> Option<BillDetails> {
    let lowered = description.to_lowercase();
    if lowered.contains("tnb") {
        Some(BillDetails {
            payee_name: "TNB".to_string(),
            account_number: "220000123456".to_string(),
            amount: 150.50,
            due_date: None,
        })
    } else if lowered.contains("syabas") {
        Some(BillDetails {
            payee_name: "Syabas".to_string(),
            account_number: "880011223344".to_string(),
            amount: 45.00,
            due_date: None,
        })
    } else {
        None
    }
}

/// Simulate analyzing a bill image from its description
pub fn analyze_bill_image(image_description: &str) -> String {
    info!(
        "Executing tool: analyze_bill_image (description={:.50})",
        image_description
    );
    match detect_bill(image_description) {
        Some(bill) => format!(
            "I've detected a {} bill for RM {:.2}. Would you like me to prepare the payment?",
            bill.payee_name, bill.amount
        ),
        None => {
            "I couldn't clearly identify the biller. Please provide the payee and amount manually."
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_known_billers() {
        let tnb = detect_bill("a photo of my TNB electricity bill").unwrap();
        assert_eq!(tnb.payee_name, "TNB");
        assert_eq!(tnb.amount, 150.50);

        let syabas = detect_bill("syabas water bill").unwrap();
        assert_eq!(syabas.payee_name, "Syabas");
    }

    #[test]
    fn test_unknown_biller_asks_for_details() {
        assert!(detect_bill("some handwritten receipt").is_none());
        let reply = analyze_bill_image("some handwritten receipt");
        assert!(reply.contains("couldn't clearly identify"));
    }

    #[test]
    fn test_known_biller_offers_payment() {
        let reply = analyze_bill_image("TNB bill for this month");
        assert!(reply.contains("TNB"));
        assert!(reply.contains("RM 150.50"));
    }
}
