#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|inputs: Vec<String>| {
    let inputs: Vec<String> = inputs.into_iter().take(8).collect();
    let result = subthread::search::longest_common_substrings(&inputs);

    // Every reported substring has the reported length and occurs in every input
    for substring in &result.substrings {
        assert_eq!(substring.chars().count(), result.length);
        for input in &inputs {
            assert!(input.contains(substring.as_str()));
        }
    }

    if inputs.len() == 2 {
        let d = subthread::search::distance(&inputs[0], &inputs[1], Some(result.first()));
        assert!((0.0..=1.0).contains(&d));
    }
});
