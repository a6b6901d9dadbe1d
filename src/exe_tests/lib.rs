mod playback_tests;
