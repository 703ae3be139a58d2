//! Quantity line items for egg harvest logs.

use tracing::debug;

use crate::harvest::catalog::EggTypeCatalog;
use crate::harvest::workflow::WorkflowPolicy;
use crate::model::{HarvestSubmission, QuantityLineItem};
use crate::traits::Translator;

pub const EGG_UNITS: &str = "egg(s)";
pub const TOTAL_LABEL: &str = "Total";

/// Ordered line items plus the total that names the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltQuantities {
    pub items: Vec<QuantityLineItem>,
    pub total: u64,
}

pub struct QuantityBuilder<'a> {
    translator: &'a dyn Translator,
}

impl<'a> QuantityBuilder<'a> {
    pub fn new(translator: &'a dyn Translator) -> Self {
        Self { translator }
    }

    pub fn build(
        &self,
        submission: &HarvestSubmission,
        policy: &WorkflowPolicy,
        catalog: &EggTypeCatalog,
    ) -> BuiltQuantities {
        let units = self.translator.translate(EGG_UNITS);

        let per_type: Vec<QuantityLineItem> = catalog
            .list_active()
            .iter()
            .filter_map(|egg_type| {
                submission
                    .quantity_for(&egg_type.id)
                    .filter(|value| *value > 0)
                    .map(|value| {
                        QuantityLineItem::count(value, units.clone(), Some(egg_type.label.clone()))
                    })
            })
            .collect();
        let subtotal = per_type
            .iter()
            .fold(0u64, |sum, q| sum.saturating_add(q.value));

        let built = match submission.total_quantity {
            Some(total) if policy.accepts_total() => {
                let label = if per_type.is_empty() {
                    None
                } else {
                    Some(self.translator.translate(TOTAL_LABEL))
                };
                let mut items = Vec::with_capacity(per_type.len() + 1);
                items.push(QuantityLineItem::count(total, units, label));
                items.extend(per_type);
                BuiltQuantities { items, total }
            }
            _ => BuiltQuantities {
                items: per_type,
                total: subtotal,
            },
        };

        debug!(
            workflow = %policy.mode,
            line_items = built.items.len(),
            total = built.total,
            "Built harvest quantities"
        );
        built
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::workflow::WorkflowMode;
    use crate::model::{EggType, EggTypeId};
    use crate::traits::SourceLanguage;
    use proptest::prelude::*;

    fn catalog() -> EggTypeCatalog {
        EggTypeCatalog::new(vec![
            EggType::new("1", "Brown"),
            EggType::new("2", "White"),
            EggType::new("3", "Blue"),
        ])
    }

    fn submission(total: Option<u64>, per_type: &[(&str, u64)]) -> HarvestSubmission {
        HarvestSubmission {
            total_quantity: total,
            per_type_quantities: per_type
                .iter()
                .map(|(id, v)| (EggTypeId::from(*id), *v))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_simple_total_only() {
        let builder = QuantityBuilder::new(&SourceLanguage);
        let built = builder.build(
            &submission(Some(12), &[]),
            &WorkflowPolicy::new(WorkflowMode::Simple),
            &catalog(),
        );

        assert_eq!(built.total, 12);
        assert_eq!(built.items, vec![QuantityLineItem::count(12, "egg(s)", None)]);
    }

    #[test]
    fn test_simple_with_subtotals_labels_total_first() {
        let builder = QuantityBuilder::new(&SourceLanguage);
        let built = builder.build(
            &submission(Some(20), &[("2", 4), ("1", 6)]),
            &WorkflowPolicy::new(WorkflowMode::Simple),
            &catalog(),
        );

        // Total is taken verbatim, not recomputed from subtotals.
        assert_eq!(built.total, 20);
        let labels: Vec<_> = built.items.iter().map(|q| q.label.as_deref()).collect();
        assert_eq!(labels, vec![Some("Total"), Some("Brown"), Some("White")]);
        assert_eq!(built.items[0].value, 20);
    }

    #[test]
    fn test_zero_subtotals_are_omitted() {
        let builder = QuantityBuilder::new(&SourceLanguage);
        let built = builder.build(
            &submission(Some(5), &[("1", 0), ("2", 0)]),
            &WorkflowPolicy::new(WorkflowMode::Simple),
            &catalog(),
        );

        assert_eq!(built.items.len(), 1);
        assert_eq!(built.items[0].label, None);
    }

    #[test]
    fn test_detailed_sums_subtotals_without_total_item() {
        let builder = QuantityBuilder::new(&SourceLanguage);
        let built = builder.build(
            &submission(None, &[("1", 5), ("2", 3)]),
            &WorkflowPolicy::new(WorkflowMode::Detailed),
            &catalog(),
        );

        assert_eq!(built.total, 8);
        assert_eq!(
            built.items,
            vec![
                QuantityLineItem::count(5, "egg(s)", Some("Brown".into())),
                QuantityLineItem::count(3, "egg(s)", Some("White".into())),
            ]
        );
    }

    #[test]
    fn test_detailed_ignores_submitted_total() {
        let builder = QuantityBuilder::new(&SourceLanguage);
        let built = builder.build(
            &submission(Some(99), &[("3", 2)]),
            &WorkflowPolicy::new(WorkflowMode::Detailed),
            &catalog(),
        );

        assert_eq!(built.total, 2);
        assert_eq!(built.items.len(), 1);
    }

    #[test]
    fn test_legacy_flag_derives_total_under_simple() {
        let policy = WorkflowPolicy {
            mode: WorkflowMode::Simple,
            require_quantities_per_egg_type: true,
        };
        let builder = QuantityBuilder::new(&SourceLanguage);
        let built = builder.build(&submission(Some(50), &[("1", 1), ("3", 1)]), &policy, &catalog());

        assert_eq!(built.total, 2);
        assert!(built.items.iter().all(|q| q.label.as_deref() != Some("Total")));
    }

    #[test]
    fn test_empty_catalog_builds_nothing() {
        let builder = QuantityBuilder::new(&SourceLanguage);
        let built = builder.build(
            &submission(None, &[("1", 5)]),
            &WorkflowPolicy::new(WorkflowMode::Detailed),
            &EggTypeCatalog::default(),
        );

        assert!(built.items.is_empty());
        assert_eq!(built.total, 0);
    }

    #[test]
    fn test_unknown_egg_type_is_ignored() {
        let builder = QuantityBuilder::new(&SourceLanguage);
        let built = builder.build(
            &submission(None, &[("42", 7), ("1", 1)]),
            &WorkflowPolicy::new(WorkflowMode::Detailed),
            &catalog(),
        );

        assert_eq!(built.total, 1);
    }

    proptest! {
        #[test]
        fn prop_simple_total_only_is_single_unlabelled_item(n in 0u64..1_000_000) {
            let builder = QuantityBuilder::new(&SourceLanguage);
            let built = builder.build(
                &submission(Some(n), &[]),
                &WorkflowPolicy::new(WorkflowMode::Simple),
                &catalog(),
            );
            prop_assert_eq!(built.total, n);
            prop_assert_eq!(built.items.len(), 1);
            prop_assert_eq!(built.items[0].value, n);
            prop_assert!(built.items[0].label.is_none());
        }

        #[test]
        fn prop_detailed_total_is_sum_of_items(a in 0u64..10_000, b in 0u64..10_000, c in 0u64..10_000) {
            let builder = QuantityBuilder::new(&SourceLanguage);
            let built = builder.build(
                &submission(None, &[("1", a), ("2", b), ("3", c)]),
                &WorkflowPolicy::new(WorkflowMode::Detailed),
                &catalog(),
            );
            prop_assert_eq!(built.total, a + b + c);
            prop_assert_eq!(built.items.iter().map(|q| q.value).sum::<u64>(), built.total);
            prop_assert!(built.items.iter().all(|q| q.value > 0));
        }

        #[test]
        fn prop_total_label_only_at_front(n in 0u64..1000, a in 1u64..100, b in 0u64..100) {
            let builder = QuantityBuilder::new(&SourceLanguage);
            let built = builder.build(
                &submission(Some(n), &[("1", a), ("3", b)]),
                &WorkflowPolicy::new(WorkflowMode::Simple),
                &catalog(),
            );
            let totals: Vec<_> = built
                .items
                .iter()
                .enumerate()
                .filter(|(_, q)| q.label.as_deref() == Some("Total"))
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(totals, vec![0]);
        }
    }
}
