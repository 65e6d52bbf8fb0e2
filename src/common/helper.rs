use crate::{Datum, Error};


/// Collect the items up to and including the first error, if any.
pub(crate) fn collect_up_to_first_err<I>(iter: I) -> Vec<Result<Datum, Error>>
    where I: Iterator<Item = Result<Datum, Error>>,
{
    let mut already_errored = false;
    iter.take_while(|r|
                    if already_errored {
                        false
                    } else {
                        if r.is_err() {
                            already_errored = true;
                        }
                        true
                    })
        .collect()
}
