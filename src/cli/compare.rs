use indicatif::ProgressBar;

use crate::{
    compare::ComparisonEngine, error, error::CompareError, info, success, types::Step, warning,
};

use super::{open_engine, show};

pub async fn compare(refresh: bool) {
    let (client, mut engine, bar) = open_engine().await;

    if !client.is_authenticated().await {
        error!("No user is logged in. Run tunetwin login first.");
    }

    if refresh {
        info!("Refreshing the comparison...");
        let outcome = engine.refresh().await;
        bar.finish_and_clear();
        report(&engine, outcome);
        return;
    }

    let second_user = match client.session().is_second_user().await {
        Ok(second_user) => second_user,
        Err(e) => error!("Failed to read stored session. Err: {}", e),
    };

    if second_user && !client.session().has_first_user().await.unwrap_or(false) {
        warning!("The first user's library is no longer stored, nothing can be in common. Use --refresh to fetch both users again.");
    }

    run_pass(&mut engine, &bar, second_user).await;
}

/// Runs one regular engine pass and reports its outcome.
pub(super) async fn run_pass(engine: &mut ComparisonEngine, bar: &ProgressBar, second_user: bool) {
    info!(
        "Fetching the library of the {} user...",
        if second_user { "second" } else { "first" }
    );

    let outcome = engine.compare_users(false, second_user).await;
    bar.finish_and_clear();
    report(engine, outcome);
}

fn report(engine: &ComparisonEngine, outcome: Result<Step, CompareError>) {
    match outcome {
        Ok(Step::Second) => {
            let name = engine
                .profiles()
                .user1
                .as_ref()
                .map(|p| p.display_name.clone())
                .unwrap_or_default();
            success!("Stored the library of {}.", name);
            info!("Now log in the second user with: tunetwin login --second --token <TOKEN>");
        }
        Ok(Step::Comparing) => {
            let result = engine.result();
            success!(
                "Found {} common songs and {} common artists.",
                result.common_songs.len(),
                result.common_artists.len()
            );
            show::render(engine.state());
        }
        Ok(Step::First) => {}
        Err(e) => error!("{}", e.user_message()),
    }
}
