/// Calls the given closure until it succeeds, waiting 5, 10 and 20 seconds between attempts.
/// The result of the last attempt is returned.
#[macro_export]
macro_rules! retry {
    ($f:expr) => {{
        let mut wait: u64 = 5;
        loop {
            let res = $f();
            match res {
                Ok(_) => break res,
                Err(ref e) if wait <= 20 => {
                    log::warn!("attempt failed, retrying in {} seconds: {}", wait, e);
                    std::thread::sleep(std::time::Duration::from_secs(wait));
                    wait *= 2;
                }
                Err(_) => break res,
            }
        }
    }};
}
