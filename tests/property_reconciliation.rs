//! Property tests: completions that do not carry a fetch's key never touch its slot.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{fulfilled, rejected, task};
use linguo::domain::models::{AccountKey, CorrelationKey, LoadingState, TaskId};
use linguo::services::{EventBus, RequesterConfig, RequesterService};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

#[derive(Debug, Clone)]
enum Foreign {
    Fulfilled(Vec<u64>),
    Rejected(String),
}

fn foreign_completion() -> impl Strategy<Value = Foreign> {
    prop_oneof![
        prop::collection::vec(0u64..1000, 0..5).prop_map(Foreign::Fulfilled),
        "[a-z ]{1,16}".prop_map(Foreign::Rejected),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Property: a fetch stays Loading, with its previous ids, whatever
    /// foreign completions arrive, and then settles on its own key.
    #[test]
    fn prop_foreign_completions_never_settle_a_fetch(
        completions in prop::collection::vec(foreign_completion(), 1..8),
        own in prop::collection::vec(0u64..1000, 1..4),
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let bus = Arc::new(EventBus::default());
            let service = RequesterService::new(bus.clone(), RequesterConfig::default());
            let account = AccountKey::from("0xabc");
            let key = service.fetch_tasks(account.clone(), None).await;

            for completion in &completions {
                let other = CorrelationKey::generate();
                match completion {
                    Foreign::Fulfilled(ids) => {
                        let tasks = ids.iter().map(|id| task(*id, "0xabc")).collect();
                        bus.publish(fulfilled(other, tasks));
                    }
                    Foreign::Rejected(message) => {
                        bus.publish(rejected(other, message));
                    }
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;

            prop_assert_eq!(service.loading_state(&account).await, LoadingState::Loading);
            prop_assert!(service.task_ids(&account).await.is_empty());

            bus.publish(fulfilled(key, own.iter().map(|id| task(*id, "0xabc")).collect()));
            common::wait_for_state(&service, &account, LoadingState::Fetched).await;
            let expected: Vec<TaskId> = own.iter().copied().map(TaskId).collect();
            prop_assert_eq!(service.task_ids(&account).await, expected);
            Ok::<(), TestCaseError>(())
        })?;
    }
}
